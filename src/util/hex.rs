//! Hex formatting helpers for trace output.

/// Format a byte offset as "decimal (0xhex)".
pub fn format_offset(offset: usize) -> String {
    format!("{} (0x{:x})", offset, offset)
}

/// Format bytes as a compact hex string (e.g., "4a2f00ff").
pub fn format_bytes(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Format bytes as spaced hex with an ASCII sidebar, one line.
///
/// ```text
/// 06 05 00 00 00 48 65 61 |.....Hea|
/// ```
pub fn hex_line(data: &[u8]) -> String {
    let mut line = String::new();
    for byte in data {
        line.push_str(&format!("{:02x} ", byte));
    }
    line.push('|');
    for byte in data {
        if byte.is_ascii_graphic() || *byte == b' ' {
            line.push(*byte as char);
        } else {
            line.push('.');
        }
    }
    line.push('|');
    line
}
