//! Packaged code-page tables
//!
//! Each table maps all 256 byte values of a single-byte EBCDIC code page to
//! Unicode characters. A `'\0'` entry anywhere other than index 0 marks a
//! byte with no assignment in that code page; the codec decodes such bytes
//! as '?'. The tables shipped here are fully assigned.

/// EBCDIC Code Page 037 (US/Canada) to Unicode
///
/// This is the standard CP037 assignment used by US-English mainframe and
/// AS/400 systems, including the C1 control range and the Latin-1
/// supplement characters, so round trips through the reverse map are exact.
pub const CP037: [char; 256] = [
    '\u{00}', '\u{01}', '\u{02}', '\u{03}', '\u{9C}', '\u{09}', '\u{86}', '\u{7F}', // 0x00-0x07
    '\u{97}', '\u{8D}', '\u{8E}', '\u{0B}', '\u{0C}', '\u{0D}', '\u{0E}', '\u{0F}', // 0x08-0x0F
    '\u{10}', '\u{11}', '\u{12}', '\u{13}', '\u{9D}', '\u{85}', '\u{08}', '\u{87}', // 0x10-0x17
    '\u{18}', '\u{19}', '\u{92}', '\u{8F}', '\u{1C}', '\u{1D}', '\u{1E}', '\u{1F}', // 0x18-0x1F
    '\u{80}', '\u{81}', '\u{82}', '\u{83}', '\u{84}', '\u{0A}', '\u{17}', '\u{1B}', // 0x20-0x27
    '\u{88}', '\u{89}', '\u{8A}', '\u{8B}', '\u{8C}', '\u{05}', '\u{06}', '\u{07}', // 0x28-0x2F
    '\u{90}', '\u{91}', '\u{16}', '\u{93}', '\u{94}', '\u{95}', '\u{96}', '\u{04}', // 0x30-0x37
    '\u{98}', '\u{99}', '\u{9A}', '\u{9B}', '\u{14}', '\u{15}', '\u{9E}', '\u{1A}', // 0x38-0x3F
    ' ',      '\u{A0}', 'â',      'ä',      'à',      'á',      'ã',      'å',      // 0x40-0x47
    'ç',      'ñ',      '¢',      '.',      '<',      '(',      '+',      '|',      // 0x48-0x4F
    '&',      'é',      'ê',      'ë',      'è',      'í',      'î',      'ï',      // 0x50-0x57
    'ì',      'ß',      '!',      '$',      '*',      ')',      ';',      '¬',      // 0x58-0x5F
    '-',      '/',      'Â',      'Ä',      'À',      'Á',      'Ã',      'Å',      // 0x60-0x67
    'Ç',      'Ñ',      '¦',      ',',      '%',      '_',      '>',      '?',      // 0x68-0x6F
    'ø',      'É',      'Ê',      'Ë',      'È',      'Í',      'Î',      'Ï',      // 0x70-0x77
    'Ì',      '`',      ':',      '#',      '@',      '\'',     '=',      '"',      // 0x78-0x7F
    'Ø',      'a',      'b',      'c',      'd',      'e',      'f',      'g',      // 0x80-0x87
    'h',      'i',      '«',      '»',      'ð',      'ý',      'þ',      '±',      // 0x88-0x8F
    '°',      'j',      'k',      'l',      'm',      'n',      'o',      'p',      // 0x90-0x97
    'q',      'r',      'ª',      'º',      'æ',      '¸',      'Æ',      '¤',      // 0x98-0x9F
    'µ',      '~',      's',      't',      'u',      'v',      'w',      'x',      // 0xA0-0xA7
    'y',      'z',      '¡',      '¿',      'Ð',      'Ý',      'Þ',      '®',      // 0xA8-0xAF
    '^',      '£',      '¥',      '·',      '©',      '§',      '¶',      '¼',      // 0xB0-0xB7
    '½',      '¾',      '[',      ']',      '¯',      '¨',      '´',      '×',      // 0xB8-0xBF
    '{',      'A',      'B',      'C',      'D',      'E',      'F',      'G',      // 0xC0-0xC7
    'H',      'I',      '\u{AD}', 'ô',      'ö',      'ò',      'ó',      'õ',      // 0xC8-0xCF
    '}',      'J',      'K',      'L',      'M',      'N',      'O',      'P',      // 0xD0-0xD7
    'Q',      'R',      '¹',      'û',      'ü',      'ù',      'ú',      'ÿ',      // 0xD8-0xDF
    '\\',     '÷',      'S',      'T',      'U',      'V',      'W',      'X',      // 0xE0-0xE7
    'Y',      'Z',      '²',      'Ô',      'Ö',      'Ò',      'Ó',      'Õ',      // 0xE8-0xEF
    '0',      '1',      '2',      '3',      '4',      '5',      '6',      '7',      // 0xF0-0xF7
    '8',      '9',      '³',      'Û',      'Ü',      'Ù',      'Ú',      '\u{9F}', // 0xF8-0xFF
];

/// Builds the CP1140 table: the euro variant of CP037, identical except
/// that the international currency sign at 0x9F becomes the euro sign.
pub fn cp1140() -> [char; 256] {
    let mut table = CP037;
    table[0x9F] = '€';
    table
}
