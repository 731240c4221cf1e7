//! Single-byte legacy code-page transcoding
//!
//! Every text field on the NJE wire (node names, request-type tags) is
//! carried in a single-byte EBCDIC code page. This module consolidates the
//! transcoding into one place: a `Codepage` is a total byte→char function
//! with a partial char→byte inverse, and a `CodepageRegistry` is the
//! ordered, immutable set of named pages built once and shared read-only by
//! every session.
//!
//! The reverse map is a sparse high-byte/low-byte split: 256 buckets, each
//! either absent or a dense 256-entry page. That keeps memory bounded over
//! the full 16-bit logical character space while keeping both directions
//! O(1) per element.

pub mod tables;

use once_cell::sync::Lazy;

/// A single named code page with forward and reverse maps
pub struct Codepage {
    name: String,
    /// Byte to character. Total; `'\0'` outside index 0 marks an
    /// unassigned byte.
    to_char: [char; 256],
    /// Character to byte, sparse on the character's high byte
    to_byte: Vec<Option<Box<[u8; 256]>>>,
    /// Byte emitted for characters the page cannot represent. Computed
    /// once at load time from the page's mapping for '?', 0 if '?' is
    /// not mapped.
    substitute: u8,
    /// Encoding of ' ', used for field padding and SCB blank runs
    blank: u8,
}

impl Codepage {
    /// Builds a code page from a 256-entry byte→char table, constructing
    /// the sparse reverse map and the substitute/blank bytes.
    pub fn from_table(name: &str, table: [char; 256]) -> Self {
        let mut to_byte: Vec<Option<Box<[u8; 256]>>> = Vec::with_capacity(256);
        to_byte.resize_with(256, || None);

        for (byte, &ch) in table.iter().enumerate() {
            let code = ch as u32;
            let high = (code >> 8) as usize;
            let low = (code & 0xFF) as usize;
            let bucket = to_byte[high].get_or_insert_with(|| Box::new([0u8; 256]));
            bucket[low] = byte as u8;
        }

        let mut page = Self {
            name: name.to_string(),
            to_char: table,
            to_byte,
            substitute: 0,
            blank: 0,
        };
        page.substitute = page.raw_encode_char('?');
        page.blank = page.encode_char(' ');
        page
    }

    /// Name of this code page, e.g. "EBCDIC-US"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The page's blank/space byte (0x40 on every EBCDIC page)
    pub fn blank(&self) -> u8 {
        self.blank
    }

    /// Reverse lookup with no substitute fallback: 0 means unmapped
    fn raw_encode_char(&self, ch: char) -> u8 {
        let code = ch as u32;
        if code > 0xFFFF {
            return 0;
        }
        match &self.to_byte[(code >> 8) as usize] {
            Some(bucket) => bucket[(code & 0xFF) as usize],
            None => 0,
        }
    }

    /// Encodes one character. Unmapped characters become the substitute
    /// byte; NUL always encodes to 0.
    pub fn encode_char(&self, ch: char) -> u8 {
        let byte = self.raw_encode_char(ch);
        if byte == 0 && ch != '\0' {
            self.substitute
        } else {
            byte
        }
    }

    /// Decodes one byte. An unassigned byte decodes to '?'; byte 0 always
    /// decodes to NUL.
    pub fn decode_byte(&self, byte: u8) -> char {
        let ch = self.to_char[byte as usize];
        if ch == '\0' && byte != 0 {
            '?'
        } else {
            ch
        }
    }

    /// Encodes a string, one byte per character. Total and
    /// length-preserving; never fails.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars().map(|ch| self.encode_char(ch)).collect()
    }

    /// Decodes a byte slice, one character per byte. Total and
    /// length-preserving; never fails.
    pub fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&b| self.decode_byte(b)).collect()
    }

    /// Encodes a text field into exactly `width` bytes: right-padded with
    /// the blank byte when shorter, truncated when longer. This is the
    /// layout rule for every fixed-width name field on the wire.
    pub fn encode_field(&self, text: &str, width: usize) -> Vec<u8> {
        let mut out: Vec<u8> = text.chars().take(width).map(|ch| self.encode_char(ch)).collect();
        out.resize(width, self.blank);
        out
    }

    /// Decodes a fixed-width field and trims the trailing blank padding
    pub fn decode_field(&self, bytes: &[u8]) -> String {
        let trimmed_len = bytes
            .iter()
            .rposition(|&b| b != self.blank && b != 0)
            .map_or(0, |p| p + 1);
        self.decode(&bytes[..trimmed_len])
    }
}

/// Ordered, immutable set of named code pages
pub struct CodepageRegistry {
    pages: Vec<Codepage>,
}

impl CodepageRegistry {
    /// Builds the registry from the packaged table set. The first entry is
    /// the default page.
    pub fn builtin() -> Self {
        Self {
            pages: vec![
                Codepage::from_table("EBCDIC-US", tables::CP037),
                Codepage::from_table("EBCDIC-1140", tables::cp1140()),
            ],
        }
    }

    /// Case-insensitive lookup by name
    pub fn get(&self, name: &str) -> Option<&Codepage> {
        self.pages.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// The registry's default page (the first one loaded)
    pub fn default_page(&self) -> &Codepage {
        &self.pages[0]
    }

    /// Names of all loaded pages, in load order
    pub fn names(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Process-wide registry instance, built on first use and never torn down
static GLOBAL_REGISTRY: Lazy<CodepageRegistry> = Lazy::new(CodepageRegistry::builtin);

/// Returns the shared process-wide registry
pub fn default_registry() -> &'static CodepageRegistry {
    &GLOBAL_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn us() -> Codepage {
        Codepage::from_table("EBCDIC-US", tables::CP037)
    }

    #[test]
    fn test_encode_decode_basic() {
        let page = us();
        // "HELLO" in EBCDIC CP037
        assert_eq!(page.encode("HELLO"), vec![0xC8, 0xC5, 0xD3, 0xD3, 0xD6]);
        assert_eq!(page.decode(&[0xC8, 0xC5, 0xD3, 0xD3, 0xD6]), "HELLO");
    }

    #[test]
    fn test_blank_and_substitute_bytes() {
        let page = us();
        assert_eq!(page.blank(), 0x40);
        // '?' is 0x6F in CP037; unmapped characters must encode to it
        assert_eq!(page.encode_char('?'), 0x6F);
        assert_eq!(page.encode_char('\u{4E2D}'), 0x6F);
    }

    #[test]
    fn test_nul_maps_to_zero_both_ways() {
        let page = us();
        assert_eq!(page.encode_char('\0'), 0x00);
        assert_eq!(page.decode_byte(0x00), '\0');
    }

    #[test]
    fn test_length_preservation() {
        let page = us();
        let text = "NETNJE 123 ?";
        assert_eq!(page.encode(text).len(), text.chars().count());
        let bytes = [0u8; 17];
        assert_eq!(page.decode(&bytes).chars().count(), 17);
    }

    #[test]
    fn test_field_padding_and_truncation() {
        let page = us();
        let field = page.encode_field("NJE", 8);
        assert_eq!(field.len(), 8);
        assert_eq!(&field[..3], &[0xD5, 0xD1, 0xC5]);
        assert_eq!(&field[3..], &[0x40; 5]);
        assert_eq!(page.decode_field(&field), "NJE");

        let long = page.encode_field("ABCDEFGHIJ", 8);
        assert_eq!(long.len(), 8);
        assert_eq!(page.decode_field(&long), "ABCDEFGH");
    }

    #[test]
    fn test_registry_lookup_case_insensitive() {
        let registry = CodepageRegistry::builtin();
        assert!(registry.get("ebcdic-us").is_some());
        assert!(registry.get("EBCDIC-1140").is_some());
        assert!(registry.get("EBCDIC-NOPE").is_none());
        assert_eq!(registry.default_page().name(), "EBCDIC-US");
        assert_eq!(registry.names(), vec!["EBCDIC-US", "EBCDIC-1140"]);
    }

    #[test]
    fn test_global_registry_is_shared() {
        let a = default_registry();
        let b = default_registry();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_euro_variant_round_trip() {
        let registry = CodepageRegistry::builtin();
        let euro = registry.get("EBCDIC-1140").unwrap();
        assert_eq!(euro.encode("€"), vec![0x9F]);
        assert_eq!(euro.decode(&[0x9F]), "€");
        // On the US page the same byte is the currency sign
        assert_eq!(registry.default_page().decode(&[0x9F]), "¤");
    }
}
