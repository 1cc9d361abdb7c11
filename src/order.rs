//! Core order record and status types
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// Where an order sits in the kitchen. Declaration order is the lifecycle order.
#[derive(
    minicbor::Encode,
    minicbor::Decode,
    serde::Serialize,
    Debug,
    Clone,
    Copy,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[n(0)]
    New,
    #[n(1)]
    Preparing,
    #[n(2)]
    Served,
    #[n(3)]
    Closed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::New,
        Status::Preparing,
        Status::Served,
        Status::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Preparing => "preparing",
            Status::Served => "served",
            Status::Closed => "closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A line on the ticket. The lifecycle never looks inside these.
#[derive(
    minicbor::Encode,
    minicbor::Decode,
    serde::Serialize,
    serde::Deserialize,
    Debug,
    Clone,
    Eq,
    PartialEq,
)]
pub struct Item {
    #[n(0)]
    pub name: String,
    #[n(1)]
    pub quantity: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

#[derive(minicbor::Encode, minicbor::Decode, serde::Serialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[n(0)]
    pub id: String, // bech32 encoded uuid7, assigned by the store
    #[n(1)]
    pub status: Status,
    #[n(2)]
    pub items: Vec<Item>,
    #[n(3)]
    pub create_time: TimeStamp<Utc>,
    #[n(4)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<TimeStamp<Utc>>, // entered the kitchen
    #[n(5)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serve_time: Option<TimeStamp<Utc>>, // left the kitchen
    #[n(6)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_time: Option<TimeStamp<Utc>>, // paid up
}

impl Order {
    /// A freshly placed order. Only `create_time` is stamped.
    pub fn new(id: String, items: Vec<Item>, create_time: TimeStamp<Utc>) -> Self {
        Self {
            id,
            status: Status::New,
            items,
            create_time,
            start_time: None,
            serve_time: None,
            checkout_time: None,
        }
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, minicbor::encode::Error<std::convert::Infallible>> {
        minicbor::to_vec(self)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, minicbor::decode::Error> {
        minicbor::decode(bytes)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

// RFC 3339 on the wire, e.g. "2024-06-15T10:30:00Z"
impl serde::Serialize for TimeStamp<Utc> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.0, serializer)
    }
}
