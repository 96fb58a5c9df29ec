// Copyright (c) 2026 rezky_nightky

use std::char;

/// Katakana, latin letters and digits, in that order.
pub const DEFAULT_ALPHABET: &str = concat!(
    "アカサタナハマヤラワイキシチニヒミリウクスツヌフムユルエケセテネヘメレオコソトノホモヨロヲン",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz",
    "0123456789",
);

pub struct Preset {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    literal: &'static str,
    ranges: &'static [(u32, u32)],
}

impl Preset {
    pub fn chars(&self) -> String {
        let mut out = String::from(self.literal);
        for &(start, end) in self.ranges {
            out.extend((start..=end).filter_map(char::from_u32));
        }
        out
    }
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "matrix",
        aliases: &["default"],
        description: "Katakana + latin letters + digits",
        literal: DEFAULT_ALPHABET,
        ranges: &[],
    },
    Preset {
        name: "katakana",
        aliases: &[],
        description: "Full-width katakana (double-width in terminals)",
        literal: "",
        ranges: &[(0x30A1, 0x30FA)],
    },
    Preset {
        name: "halfwidth",
        aliases: &["hw"],
        description: "Half-width katakana (single cell)",
        literal: "",
        ranges: &[(0xFF66, 0xFF9D)],
    },
    Preset {
        name: "latin",
        aliases: &["english"],
        description: "Latin letters",
        literal: "",
        ranges: &[(0x41, 0x5A), (0x61, 0x7A)],
    },
    Preset {
        name: "digits",
        aliases: &["dec"],
        description: "Digits only",
        literal: "",
        ranges: &[(0x30, 0x39)],
    },
    Preset {
        name: "binary",
        aliases: &["bin", "01"],
        description: "0 and 1",
        literal: "01",
        ranges: &[],
    },
    Preset {
        name: "hex",
        aliases: &[],
        description: "0-9 and A-F",
        literal: "",
        ranges: &[(0x30, 0x39), (0x41, 0x46)],
    },
    Preset {
        name: "greek",
        aliases: &[],
        description: "Greek capitals and small letters",
        literal: "",
        ranges: &[(0x0391, 0x03A9), (0x03B1, 0x03C9)],
    },
    Preset {
        name: "cyrillic",
        aliases: &[],
        description: "Cyrillic",
        literal: "",
        ranges: &[(0x0410, 0x044F)],
    },
    Preset {
        name: "braille",
        aliases: &[],
        description: "Braille patterns",
        literal: "",
        ranges: &[(0x2801, 0x28FF)],
    },
    Preset {
        name: "runic",
        aliases: &[],
        description: "Runic",
        literal: "",
        ranges: &[(0x16A0, 0x16EA)],
    },
    Preset {
        name: "blocks",
        aliases: &[],
        description: "Block elements",
        literal: "",
        ranges: &[(0x2580, 0x259F)],
    },
];

pub fn alphabet_preset(spec: &str) -> Result<String, String> {
    let spec = spec.trim().to_ascii_lowercase();
    PRESETS
        .iter()
        .find(|p| p.name == spec || p.aliases.contains(&spec.as_str()))
        .map(Preset::chars)
        .ok_or_else(|| format!("unsupported charset: {} (see --list-charsets)", spec))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alphabet_mixes_three_scripts() {
        let chars: Vec<char> = DEFAULT_ALPHABET.chars().collect();
        assert_eq!(chars.len(), 46 + 52 + 10);
        assert_eq!(chars[0], 'ア');
        assert_eq!(chars[46], 'A');
        assert_eq!(*chars.last().unwrap(), '9');
    }

    #[test]
    fn presets_resolve_by_name_and_alias() {
        assert_eq!(alphabet_preset("binary").unwrap(), "01");
        assert_eq!(alphabet_preset(" 01 ").unwrap(), "01");
        assert_eq!(alphabet_preset("hex").unwrap(), "0123456789ABCDEF");
        assert_eq!(alphabet_preset("default").unwrap(), DEFAULT_ALPHABET);
        assert!(alphabet_preset("klingon").is_err());
    }
}
