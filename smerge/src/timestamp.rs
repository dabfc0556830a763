use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, TimeDelta};
use chrono_tz::{Tz, US::Pacific};
use serde::{Deserialize, Deserializer};
use std::{fmt, str::FromStr};

/// Empirical correction subtracted from every send time before display.
const TIMEZONE_CORRECTION_HOURS: i64 = 7;

/// Slack `ts` value (`seconds.microseconds`), kept alongside its integer form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    micros: i64,
    local: DateTime<Tz>,
}

impl Timestamp {
    pub fn parse(raw: &str) -> Result<Self> {
        let micros: i64 = raw
            .replace('.', "")
            .parse()
            .with_context(|| format!("invalid Slack timestamp '{raw}'"))?;

        let local = DateTime::from_timestamp_micros(micros)
            .and_then(|utc| utc.checked_sub_signed(TimeDelta::hours(TIMEZONE_CORRECTION_HOURS)))
            .map(|utc| utc.with_timezone(&Pacific))
            .ok_or_else(|| anyhow!("Slack timestamp '{raw}' is out of range"))?;

        Ok(Self {
            raw: raw.to_string(),
            micros,
            local,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Sort key: the timestamp with its decimal point removed.
    pub fn as_micros(&self) -> i64 {
        self.micros
    }

    pub fn decode(&self) -> String {
        self.local.format("%c").to_string()
    }
}

impl FromStr for Timestamp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Render a Slack `ts` string as US/Pacific local time.
pub fn decode(ts: &str) -> Result<String> {
    Ok(Timestamp::parse(ts)?.decode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_applies_correction_in_standard_time() {
        // 1970-01-01 00:16:40 UTC, minus 7h, shown in PST
        assert_eq!(decode("1000.000100").unwrap(), "Wed Dec 31 09:16:40 1969");
    }

    #[test]
    fn test_decode_applies_correction_in_daylight_time() {
        // 2017-07-14 02:40:00 UTC, minus 7h, shown in PDT
        assert_eq!(
            decode("1500000000.000000").unwrap(),
            "Thu Jul 13 12:40:00 2017"
        );
    }

    #[test]
    fn test_decode_is_deterministic() {
        let ts = "1612345678.901234";
        assert_eq!(decode(ts).unwrap(), decode(ts).unwrap());
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert!(decode("").is_err());
        assert!(decode("abc.def").is_err());
        assert!(decode("12:30").is_err());
        let err = decode("1500000000.00x000").unwrap_err();
        assert!(err.to_string().contains("1500000000.00x000"));
    }

    #[test]
    fn test_decode_rejects_overflow() {
        assert!(decode("99999999999999999999.000000").is_err());
    }

    #[test]
    fn test_parse_strips_decimal_point() {
        let ts: Timestamp = "999.000200".parse().unwrap();
        assert_eq!(ts.as_micros(), 999_000_200);
        assert_eq!(ts.to_string(), "999.000200");
        assert!(ts.as_micros() < Timestamp::parse("1000.000100").unwrap().as_micros());
    }
}
