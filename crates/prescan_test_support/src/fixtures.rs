//! TOML fixture corpus for the prescan.
//!
//! ```toml
//! format = "html-prescan-fixtures-v1"
//!
//! [[case]]
//! id = "meta-charset-quoted"
//! input = "<meta charset=\"utf-8\">"  # or input_hex = "EF BB BF ..."
//! labels = ["utf-8"]                   # every candidate, in order
//! encoding = "UTF-8"                   # sniffed encoding name
//! source = "meta"                      # bom | meta | default
//! ```

use std::fs;
use std::path::Path;

use html_prescan::CharsetSource;
use serde::Deserialize;

pub const FIXTURES_FORMAT_V1: &str = "html-prescan-fixtures-v1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrescanCase {
    pub id: String,
    pub input: Vec<u8>,
    pub labels: Vec<String>,
    pub encoding: String,
    pub source: CharsetSource,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    format: String,
    #[serde(rename = "case", default)]
    cases: Vec<RawCase>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCase {
    id: String,
    input: Option<String>,
    input_hex: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
    encoding: String,
    source: RawSource,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawSource {
    Bom,
    Meta,
    Default,
}

impl From<RawSource> for CharsetSource {
    fn from(source: RawSource) -> Self {
        match source {
            RawSource::Bom => CharsetSource::ByteOrderMark,
            RawSource::Meta => CharsetSource::MetaPrescan,
            RawSource::Default => CharsetSource::Default,
        }
    }
}

pub fn load_fixtures(path: &Path) -> Vec<PrescanCase> {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture file {path:?}: {err}"));
    parse_fixtures(&text, &path.display().to_string())
}

/// Parse a fixture file; `origin` only appears in panic messages.
pub fn parse_fixtures(text: &str, origin: &str) -> Vec<PrescanCase> {
    let file: FixtureFile =
        toml::from_str(text).unwrap_or_else(|err| panic!("invalid fixture file {origin}: {err}"));
    assert_eq!(
        file.format, FIXTURES_FORMAT_V1,
        "unsupported fixture format in {origin}"
    );
    let mut seen = std::collections::BTreeSet::new();
    file.cases
        .into_iter()
        .map(|raw| {
            assert!(
                seen.insert(raw.id.clone()),
                "duplicate fixture id '{}' in {origin}",
                raw.id
            );
            let input = match (raw.input, raw.input_hex) {
                (Some(text), None) => text.into_bytes(),
                (None, Some(hex)) => decode_hex(&hex).unwrap_or_else(|err| {
                    panic!("case '{}' in {origin}: bad input_hex: {err}", raw.id)
                }),
                _ => panic!(
                    "case '{}' in {origin}: exactly one of input/input_hex is required",
                    raw.id
                ),
            };
            PrescanCase {
                id: raw.id,
                input,
                labels: raw.labels,
                encoding: raw.encoding,
                source: raw.source.into(),
            }
        })
        .collect()
}

/// Hex digits with optional ASCII whitespace between bytes.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits ({})", digits.len()));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let hi = hex_value(pair[0])?;
            let lo = hex_value(pair[1])?;
            Ok((hi << 4) | lo)
        })
        .collect()
}

fn hex_value(digit: u8) -> Result<u8, String> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(format!("invalid hex digit {:?}", char::from(digit))),
    }
}
