//! Id generation helpers

use bech32::Bech32m;
use uuid7::uuid7;

pub const ORDER_HRP: &str = "order_";

// construct a unique, time-ordered id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

pub fn new_order_id() -> anyhow::Result<String> {
    new_uuid_to_bech32(ORDER_HRP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ids_carry_the_prefix() {
        let id = new_order_id().unwrap();
        assert!(id.starts_with("order_1"));
    }

    #[test]
    fn order_ids_are_unique() {
        let a = new_order_id().unwrap();
        let b = new_order_id().unwrap();
        assert_ne!(a, b);
    }
}
