//! Client Identifiers
//!
//! Keys the limiter by network address plus a short hash of the user agent,
//! so distinct clients behind one address are told apart. The hash is a
//! plain rolling hash meant for compact keys, not for resisting collisions.

/// Rolling `h * 31 + c` hash over UTF-16 code units, in wrapping 32-bit
/// signed arithmetic, rendered as the absolute value in base 36.
pub fn agent_hash(agent: &str) -> String {
    let hash = agent
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));

    to_base36(hash.unsigned_abs())
}

/// Builds the limiter key for a client.
///
/// A missing user agent hashes like an empty one.
pub fn client_identifier(address: &str, agent: Option<&str>) -> String {
    format!("{}:{}", address, agent_hash(agent.unwrap_or_default()))
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
