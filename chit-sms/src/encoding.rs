//! SMS encoding utilities
//!
//! Carriers bill per segment. A message that fits the GSM 03.38 basic
//! alphabet is sent as 7-bit text; anything else (₹, Tamil, Devanagari...)
//! forces UCS-2. This module provides utilities for:
//! - Detecting whether text fits GSM-7
//! - Counting segments for a message body

/// Characters of the GSM 03.38 basic set (excluding the escape table).
const GSM7_BASIC: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?\
¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";

/// Characters reachable through the GSM escape (each costs two septets).
const GSM7_EXTENDED: &str = "^{}\\[~]|€\u{c}";

/// How a message body will be encoded on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsEncoding {
    Gsm7,
    Ucs2,
}

/// Pick the cheapest encoding able to carry `body`.
pub fn detect_encoding(body: &str) -> SmsEncoding {
    if body
        .chars()
        .all(|c| GSM7_BASIC.contains(c) || GSM7_EXTENDED.contains(c))
    {
        SmsEncoding::Gsm7
    } else {
        SmsEncoding::Ucs2
    }
}

/// Number of SMS segments needed for `body`.
///
/// Single messages carry 160 septets (GSM-7) or 70 UTF-16 units (UCS-2);
/// concatenated parts lose room to the UDH and carry 153 / 67.
pub fn segment_count(body: &str) -> u16 {
    let (units, single, multi) = match detect_encoding(body) {
        SmsEncoding::Gsm7 => {
            let septets: usize = body
                .chars()
                .map(|c| if GSM7_EXTENDED.contains(c) { 2 } else { 1 })
                .sum();
            (septets, 160, 153)
        }
        SmsEncoding::Ucs2 => (body.encode_utf16().count(), 70, 67),
    };

    if units == 0 {
        return 1;
    }
    if units <= single {
        return 1;
    }
    units.div_ceil(multi) as u16
}
