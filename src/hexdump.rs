const BYTES_PER_LINE: usize = 16;
const ASCII_COLUMN: usize = 58; // "00000000: " + 16 * "xx "

/// Renders `buf` the way `hexdump -C` does, offsets counted from zero.
pub(crate) fn format(buf: &[u8]) -> String {
    let mut out = String::new();
    for (line, chunk) in buf.chunks(BYTES_PER_LINE).enumerate() {
        let mut text = format!("{:08x}: ", line * BYTES_PER_LINE);
        for byte in chunk {
            text.push_str(&format!("{byte:02x} "));
        }
        while text.len() < ASCII_COLUMN {
            text.push(' ');
        }
        text.extend(chunk.iter().map(|&byte| if (0x20..0x7F).contains(&byte) { char::from(byte) } else { '.' }));
        out.push_str(&text);
        out.push('\n');
    }
    out
}

pub(crate) fn print(buf: &[u8]) {
    print!("{}", format(buf));
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert_eq!(format(&[]), "");
    }

    #[test]
    fn short_line_is_padded() {
        assert_eq!(
            format(&[0xDE, 0xAD, 0x41, 0x7F]),
            "00000000: de ad 41 7f                                     ..A.\n"
        );
    }

    #[test]
    fn full_lines_and_offsets() {
        let buf: Vec<u8> = (0x30..0x30 + 20).collect();
        let dump = format(&buf);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "00000000: 30 31 32 33 34 35 36 37 38 39 3a 3b 3c 3d 3e 3f 0123456789:;<=>?");
        assert_eq!(lines[1], "00000010: 40 41 42 43                                     @ABC");
    }
}
