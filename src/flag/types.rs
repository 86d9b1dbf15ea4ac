//! Per-type parse and format rules for flag values.
//!
//! Every type usable as a flag implements [`Flaggable`]. The implementations in
//! this module cover the built-in set: integers, floats, booleans, strings, hex
//! encoded bytes, durations and the IP family. Applications add their own types
//! by implementing the trait (see [`ByteSize`](super::extensions::ByteSize)).

use std::fmt;
use std::fmt::Write as _;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::time::Duration;

use super::FlagError;

/// A type whose values can be read from and rendered to command-line text.
pub trait Flaggable: Sized {
    /// Tag shown in help output for a scalar flag of this type.
    const TYPE_NAME: &'static str;

    /// Tag shown in help output for a slice flag of this type.
    const SLICE_TYPE_NAME: &'static str;

    /// Value assumed when the flag is given without an argument.
    const NO_OPT_DEFAULT: Option<&'static str> = None;

    fn parse_flag(text: &str) -> Result<Self, FlagError>;

    fn format_flag(&self) -> String;

    /// Representation stored in a config registry when the flag is bound to a key.
    fn to_config(&self) -> serde_json::Value {
        serde_json::Value::String(self.format_flag())
    }
}

/// Parses an integer literal: decimal, `0x`, `0o`, `0b` or leading-zero octal,
/// with optional sign and `_` separators between digits or after a base prefix.
fn parse_int_literal(text: &str, signed: bool) -> Result<i128, String> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') if signed => (true, &text[1..]),
        Some(b'+') if signed => (false, &text[1..]),
        Some(b'-') | Some(b'+') => return Err("sign not allowed".into()),
        _ => (false, text),
    };

    let (radix, digits, prefixed) = split_radix(body);
    if !prefixed && digits.starts_with('_') {
        return Err("invalid syntax".into());
    }
    let digits = strip_separators(digits)?;

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("invalid syntax".into());
    }

    let magnitude = i128::from_str_radix(&digits, radix).map_err(|e| e.to_string())?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn split_radix(body: &str) -> (u32, &str, bool) {
    let bytes = body.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &body[2..], true),
            b'o' | b'O' => return (8, &body[2..], true),
            b'b' | b'B' => return (2, &body[2..], true),
            _ => return (8, &body[1..], true),
        }
    }
    (10, body, false)
}

fn strip_separators(digits: &str) -> Result<String, String> {
    let digits = digits.strip_prefix('_').unwrap_or(digits);
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return Err("misplaced digit separator".into());
    }
    Ok(digits.replace('_', ""))
}

macro_rules! integer_flaggable {
    ($signed:literal => $($ty:ty => $name:literal),* $(,)?) => {$(
        impl Flaggable for $ty {
            const TYPE_NAME: &'static str = $name;
            const SLICE_TYPE_NAME: &'static str = concat!($name, "Slice");

            fn parse_flag(text: &str) -> Result<Self, FlagError> {
                let wide = parse_int_literal(text, $signed)
                    .map_err(|reason| FlagError::parse(text, $name, reason))?;
                <$ty>::try_from(wide).map_err(|_| FlagError::parse(text, $name, "value out of range"))
            }

            fn format_flag(&self) -> String {
                self.to_string()
            }

            fn to_config(&self) -> serde_json::Value {
                serde_json::Value::from(*self)
            }
        }
    )*};
}

integer_flaggable!(true =>
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    isize => "int",
);

integer_flaggable!(false =>
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
    usize => "uint",
);

macro_rules! float_flaggable {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Flaggable for $ty {
            const TYPE_NAME: &'static str = $name;
            const SLICE_TYPE_NAME: &'static str = concat!($name, "Slice");

            fn parse_flag(text: &str) -> Result<Self, FlagError> {
                text.parse::<$ty>().map_err(|e| FlagError::parse(text, $name, e))
            }

            fn format_flag(&self) -> String {
                self.to_string()
            }

            fn to_config(&self) -> serde_json::Value {
                serde_json::Value::from(*self)
            }
        }
    )*};
}

float_flaggable!(f32 => "float32", f64 => "float64");

impl Flaggable for bool {
    const TYPE_NAME: &'static str = "bool";
    const SLICE_TYPE_NAME: &'static str = "boolSlice";
    const NO_OPT_DEFAULT: Option<&'static str> = Some("true");

    fn parse_flag(text: &str) -> Result<Self, FlagError> {
        match text {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(FlagError::parse(text, "bool", "expected true or false")),
        }
    }

    fn format_flag(&self) -> String {
        self.to_string()
    }

    fn to_config(&self) -> serde_json::Value {
        serde_json::Value::Bool(*self)
    }
}

impl Flaggable for String {
    const TYPE_NAME: &'static str = "string";
    const SLICE_TYPE_NAME: &'static str = "stringSlice";

    fn parse_flag(text: &str) -> Result<Self, FlagError> {
        Ok(text.to_string())
    }

    fn format_flag(&self) -> String {
        self.clone()
    }
}

impl Flaggable for Vec<u8> {
    const TYPE_NAME: &'static str = "bytesHex";
    const SLICE_TYPE_NAME: &'static str = "bytesHexSlice";

    fn parse_flag(text: &str) -> Result<Self, FlagError> {
        hex::decode(text.trim()).map_err(|e| FlagError::parse(text, "bytesHex", e))
    }

    fn format_flag(&self) -> String {
        hex::encode_upper(self)
    }
}

impl Flaggable for Duration {
    const TYPE_NAME: &'static str = "duration";
    const SLICE_TYPE_NAME: &'static str = "durationSlice";

    fn parse_flag(text: &str) -> Result<Self, FlagError> {
        parse_duration(text)
    }

    fn format_flag(&self) -> String {
        format_duration(*self)
    }
}

impl Flaggable for IpAddr {
    const TYPE_NAME: &'static str = "ip";
    const SLICE_TYPE_NAME: &'static str = "ipSlice";

    fn parse_flag(text: &str) -> Result<Self, FlagError> {
        text.trim()
            .parse::<IpAddr>()
            .map_err(|e| FlagError::parse(text, "ip", e))
    }

    fn format_flag(&self) -> String {
        self.to_string()
    }
}

impl Flaggable for IpNet {
    const TYPE_NAME: &'static str = "ipNet";
    const SLICE_TYPE_NAME: &'static str = "ipNetSlice";

    fn parse_flag(text: &str) -> Result<Self, FlagError> {
        text.parse()
    }

    fn format_flag(&self) -> String {
        self.to_string()
    }
}

impl Flaggable for IpMask {
    const TYPE_NAME: &'static str = "ipMask";
    const SLICE_TYPE_NAME: &'static str = "ipMaskSlice";

    fn parse_flag(text: &str) -> Result<Self, FlagError> {
        text.parse()
    }

    fn format_flag(&self) -> String {
        self.to_string()
    }
}

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parses a duration such as `"300ms"`, `"1.5h"` or `"2h45m"`.
///
/// A bare `"0"` is accepted. Negative durations are rejected.
pub fn parse_duration(text: &str) -> Result<Duration, FlagError> {
    let fail = |reason: &str| FlagError::parse(text, "duration", reason);

    let mut rest = text.strip_prefix('+').unwrap_or(text);
    if rest.starts_with('-') {
        return Err(fail("negative durations are not supported"));
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(fail("empty duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after_int) = rest.split_at(int_len);

        let (frac_part, after_number) = match after_int.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
                after_dot.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(fail("expected a number"));
        }

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, remainder) = after_number.split_at(unit_len);
        if unit.is_empty() {
            return Err(fail("missing unit"));
        }
        let scale = unit_nanos(unit).ok_or_else(|| fail("unknown unit"))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| fail("number too large"))?
        };
        total = whole
            .checked_mul(scale)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| fail("duration overflows"))?;

        // 18 fractional digits are enough for nanosecond precision at any unit.
        let frac_digits = &frac_part[..frac_part.len().min(18)];
        if !frac_digits.is_empty() {
            let numerator: u128 = frac_digits.parse().map_err(|_| fail("invalid fraction"))?;
            let denominator = 10u128.pow(frac_digits.len() as u32);
            total = total
                .checked_add(numerator * scale / denominator)
                .ok_or_else(|| fail("duration overflows"))?;
        }

        rest = remainder;
    }

    let nanos = u64::try_from(total).map_err(|_| fail("duration overflows"))?;
    Ok(Duration::from_nanos(nanos))
}

/// Renders a duration the way [`parse_duration`] reads it, e.g. `"1h2m3.5s"`.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{nanos}ns");
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}\u{b5}s", decimal(nanos, NANOS_PER_MICRO, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", decimal(nanos, NANOS_PER_MILLI, 6));
    }

    let secs = nanos / NANOS_PER_SEC;
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let sub_minute = nanos % (60 * NANOS_PER_SEC);

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    let _ = write!(out, "{}s", decimal(sub_minute, NANOS_PER_SEC, 9));
    out
}

fn decimal(value: u128, unit: u128, width: usize) -> String {
    let whole = value / unit;
    let rem = value % unit;
    if rem == 0 {
        return whole.to_string();
    }
    let frac = format!("{rem:0width$}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// An IP network in CIDR notation, normalized to its network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNet {
    addr: IpAddr,
    prefix_len: u8,
}

impl IpNet {
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self, FlagError> {
        let max = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix_len > max {
            return Err(FlagError::parse(
                &format!("{addr}/{prefix_len}"),
                "ipNet",
                "prefix length too large",
            ));
        }

        let addr = match addr {
            IpAddr::V4(v4) => {
                let mask = u32::MAX.checked_shl(32 - u32::from(prefix_len)).unwrap_or(0);
                IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
            }
            IpAddr::V6(v6) => {
                let mask = u128::MAX.checked_shl(128 - u32::from(prefix_len)).unwrap_or(0);
                IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
            }
        };
        Ok(Self { addr, prefix_len })
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        Self::new(ip, self.prefix_len).is_ok_and(|net| net.addr == self.addr)
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

impl FromStr for IpNet {
    type Err = FlagError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| FlagError::parse(text, "ipNet", reason);

        let (addr, prefix) = text
            .trim()
            .split_once('/')
            .ok_or_else(|| fail("missing prefix length"))?;
        let addr: IpAddr = addr.parse().map_err(|_| fail("invalid address"))?;
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(fail("invalid prefix length"));
        }
        let prefix_len: u8 = prefix.parse().map_err(|_| fail("invalid prefix length"))?;

        Self::new(addr, prefix_len).map_err(|_| fail("prefix length too large"))
    }
}

/// An IPv4 network mask, written dotted (`255.255.255.0`) or in hex (`ffffff00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpMask([u8; 4]);

impl IpMask {
    pub fn from_octets(octets: [u8; 4]) -> Self {
        Self(octets)
    }

    /// Mask with the leading `ones` bits set.
    pub fn from_prefix_len(ones: u8) -> Self {
        let bits = u32::MAX.checked_shl(32 - u32::from(ones.min(32))).unwrap_or(0);
        Self(bits.to_be_bytes())
    }

    pub fn octets(&self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Display for IpMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for IpMask {
    type Err = FlagError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if let Ok(v4) = trimmed.parse::<Ipv4Addr>() {
            return Ok(Self(v4.octets()));
        }
        if trimmed.len() == 8 {
            let mut octets = [0u8; 4];
            if hex::decode_to_slice(trimmed, &mut octets).is_ok() {
                return Ok(Self(octets));
            }
        }
        Err(FlagError::parse(text, "ipMask", "expected a dotted or hex IPv4 mask"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_literals() {
        assert_eq!(i64::parse_flag("42").unwrap(), 42);
        assert_eq!(i64::parse_flag("-42").unwrap(), -42);
        assert_eq!(i64::parse_flag("+7").unwrap(), 7);
        assert_eq!(i32::parse_flag("0x1F").unwrap(), 31);
        assert_eq!(i32::parse_flag("0o17").unwrap(), 15);
        assert_eq!(i32::parse_flag("017").unwrap(), 15);
        assert_eq!(i32::parse_flag("0b101").unwrap(), 5);
        assert_eq!(i32::parse_flag("0x_ff_ff").unwrap(), 0xffff);
        assert_eq!(i64::parse_flag("1_000").unwrap(), 1000);
        assert_eq!(i64::parse_flag("-1_000_000").unwrap(), -1_000_000);
        assert_eq!(i32::parse_flag("0").unwrap(), 0);
    }

    #[test]
    fn test_integer_rejects_garbage() {
        assert!(i64::parse_flag("").is_err());
        assert!(i64::parse_flag("12abc").is_err());
        assert!(i64::parse_flag("_1000").is_err());
        assert!(i64::parse_flag("1000_").is_err());
        assert!(i64::parse_flag("1__000").is_err());
        assert!(i64::parse_flag("0x").is_err());
        assert!(i64::parse_flag("0x__1").is_err());
        assert!(i64::parse_flag("--1").is_err());
    }

    #[test]
    fn test_integer_range_checks() {
        assert_eq!(i8::parse_flag("127").unwrap(), 127);
        assert!(i8::parse_flag("128").is_err());
        assert_eq!(i8::parse_flag("-128").unwrap(), -128);
        assert_eq!(u8::parse_flag("255").unwrap(), 255);
        assert!(u8::parse_flag("256").is_err());
        assert_eq!(u64::parse_flag("18446744073709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn test_unsigned_rejects_sign() {
        assert!(u32::parse_flag("-1").is_err());
        assert!(u32::parse_flag("+1").is_err());
    }

    #[test]
    fn test_parse_error_names_type_and_input() {
        let err = u16::parse_flag("x").unwrap_err();
        match err {
            FlagError::Parse {
                input, type_name, ..
            } => {
                assert_eq!(input, "x");
                assert_eq!(type_name, "uint16");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_floats() {
        assert_eq!(f64::parse_flag("1.5").unwrap(), 1.5);
        assert_eq!(f64::parse_flag("1e3").unwrap(), 1000.0);
        assert!(f64::parse_flag("inf").unwrap().is_infinite());
        assert_eq!(f32::parse_flag("0.25").unwrap().format_flag(), "0.25");
        assert!(f64::parse_flag("one").is_err());
    }

    #[test]
    fn test_bool_spellings() {
        for text in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(bool::parse_flag(text).unwrap(), "{text}");
        }
        for text in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!bool::parse_flag(text).unwrap(), "{text}");
        }
        assert!(bool::parse_flag("yes").is_err());
        assert_eq!(true.format_flag(), "true");
        assert_eq!(bool::NO_OPT_DEFAULT, Some("true"));
        assert_eq!(<i32 as Flaggable>::NO_OPT_DEFAULT, None);
    }

    #[test]
    fn test_bytes_hex() {
        let bytes = Vec::<u8>::parse_flag(" deadBEEF ").unwrap();
        assert_eq!(bytes, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(bytes.format_flag(), "DEADBEEF");
        assert!(Vec::<u8>::parse_flag("abc").is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("300ms").unwrap(), Duration::from_millis(300));
        assert_eq!(
            parse_duration("5h4m").unwrap(),
            Duration::from_secs(5 * 3600 + 4 * 60)
        );
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("10us").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration("10\u{b5}s").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration("7ns").unwrap(), Duration::from_nanos(7));
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("5").is_err());
        assert!(parse_duration("5x").is_err());
        assert!(parse_duration("-5s").is_err());
        assert!(parse_duration("h").is_err());
    }

    #[test]
    fn test_parse_duration_fraction_overflow() {
        let err = parse_duration("94522879700260684295381835.999999999999999999h").unwrap_err();
        assert!(matches!(err, FlagError::Parse { .. }));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(7)), "7ns");
        assert_eq!(format_duration(Duration::from_nanos(1500)), "1.5\u{b5}s");
        assert_eq!(format_duration(Duration::from_millis(300)), "300ms");
        assert_eq!(format_duration(Duration::from_secs(3)), "3s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2m0s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(format_duration(Duration::from_millis(3_723_500)), "1h2m3.5s");
    }

    #[test]
    fn test_duration_round_trip() {
        for d in [
            Duration::from_nanos(1),
            Duration::from_micros(1234),
            Duration::from_millis(999),
            Duration::from_secs(59),
            Duration::from_secs(86_400 + 1),
            Duration::new(12, 345_678_901),
        ] {
            assert_eq!(parse_duration(&format_duration(d)).unwrap(), d);
        }
    }

    #[test]
    fn test_ip_addresses() {
        let ip = IpAddr::parse_flag(" 192.168.0.1 ").unwrap();
        assert_eq!(ip.format_flag(), "192.168.0.1");
        let v6 = IpAddr::parse_flag("2001:DB8:0:0:0:0:0:1").unwrap();
        assert_eq!(v6.format_flag(), "2001:db8::1");
    }

    #[test]
    fn test_invalid_ip_is_an_error() {
        assert!(IpAddr::parse_flag("999.999.999.999").is_err());
        assert!(IpAddr::parse_flag("").is_err());
        assert!(IpAddr::parse_flag("10.0.0").is_err());
    }

    #[test]
    fn test_ip_net_normalizes_to_network() {
        let net = IpNet::parse_flag("192.168.1.5/24").unwrap();
        assert_eq!(net.to_string(), "192.168.1.0/24");
        assert_eq!(net.prefix_len(), 24);
        assert!(net.contains("192.168.1.200".parse().unwrap()));
        assert!(!net.contains("192.168.2.1".parse().unwrap()));

        let v6 = IpNet::parse_flag("2001:db8::1/32").unwrap();
        assert_eq!(v6.to_string(), "2001:db8::/32");

        let all = IpNet::parse_flag("10.1.2.3/0").unwrap();
        assert_eq!(all.to_string(), "0.0.0.0/0");
    }

    #[test]
    fn test_ip_net_errors() {
        assert!(IpNet::parse_flag("192.168.1.0").is_err());
        assert!(IpNet::parse_flag("192.168.1.0/33").is_err());
        assert!(IpNet::parse_flag("192.168.1.0/-1").is_err());
        assert!(IpNet::parse_flag("nope/8").is_err());
    }

    #[test]
    fn test_ip_mask() {
        let dotted = IpMask::parse_flag("255.255.255.0").unwrap();
        assert_eq!(dotted.octets(), [255, 255, 255, 0]);
        assert_eq!(dotted.format_flag(), "ffffff00");

        let hexed = IpMask::parse_flag("ffff0000").unwrap();
        assert_eq!(hexed, IpMask::from_prefix_len(16));
        assert_eq!(IpMask::from_prefix_len(0).octets(), [0, 0, 0, 0]);
        assert_eq!(IpMask::from_prefix_len(32).octets(), [255; 4]);

        assert!(IpMask::parse_flag("255.255.255").is_err());
        assert!(IpMask::parse_flag("zzzzzzzz").is_err());
    }

    #[test]
    fn test_to_config_keeps_native_types() {
        assert_eq!(42i32.to_config(), serde_json::json!(42));
        assert_eq!(true.to_config(), serde_json::json!(true));
        assert_eq!(1.5f64.to_config(), serde_json::json!(1.5));
        assert_eq!(
            Duration::from_secs(90).to_config(),
            serde_json::json!("1m30s")
        );
    }
}
