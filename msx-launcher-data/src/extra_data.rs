//! Reader for the launcher's `extra-data.dat` file.
//!
//! The file is line oriented. Comment lines start with `--`; the first
//! comment block carries the file history as `-- Version X.Y <notes>` lines.
//! Each entry spans three lines:
//!
//! ```text
//! #1234
//! 3,17,5|12,abc
//! 0123...ef|4567...89
//! ```
//!
//! The first line holds the generation-msx id, the second the generations
//! bit field, the sound chips bit field, `genre1[|genre2]` and an optional
//! screenshot suffix, and the third the sha1 codes of every dump sharing this
//! data.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use thiserror::Error;

use crate::types::ExtraData;

/// File name of the extra-data file inside the launcher data directory.
pub const EXTRA_DATA_FILENAME: &str = "extra-data.dat";

const COMMENT_START: &str = "--";
const VERSION_COMMENT: &str = "-- Version ";
const ENTRY_START: char = '#';

#[derive(Debug, Error)]
pub enum ExtraDataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Read(#[from] std::io::Error),
}

/// Load the extra-data map from a file.
pub fn load_extra_data(path: &Path) -> Result<HashMap<String, ExtraData>, ExtraDataError> {
    let file = std::fs::File::open(path).map_err(|source| ExtraDataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_extra_data(std::io::BufReader::new(file))
}

/// Parse extra-data entries, keyed by sha1 code.
pub fn parse_extra_data<R: BufRead>(reader: R) -> Result<HashMap<String, ExtraData>, ExtraDataError> {
    let mut map = HashMap::new();
    let mut lines = reader.lines();

    while let Some(line) = lines.next() {
        let line = line?;
        if line.starts_with(COMMENT_START) {
            continue;
        }
        let Some(id) = line.strip_prefix(ENTRY_START) else {
            continue;
        };
        let msx_gen_id = parse_number(id);

        let Some(values) = lines.next().transpose()? else {
            break;
        };
        let extra_data = parse_values(msx_gen_id, &values);

        let Some(codes) = lines.next().transpose()? else {
            break;
        };
        for code in codes.split('|').filter(|c| !c.is_empty()) {
            map.insert(code.to_string(), extra_data.clone());
        }
    }

    Ok(map)
}

/// Return the most recent version listed in the file header, or `"0.0"`.
///
/// The header lists versions oldest first; the last `-- Version` line before
/// the first non-version line wins. A header that runs to the end of the
/// file is incomplete and also yields `"0.0"`.
pub fn extra_data_version<R: BufRead>(reader: R) -> Result<String, ExtraDataError> {
    let mut last_version_line: Option<String> = None;
    let mut header_closed = false;

    for line in reader.lines() {
        let line = line?;
        if line.starts_with(VERSION_COMMENT) {
            last_version_line = Some(line);
        } else if last_version_line.is_some() {
            header_closed = true;
            break;
        }
    }

    let Some(line) = last_version_line.filter(|_| header_closed) else {
        return Ok("0.0".to_string());
    };
    // The version number is terminated by a space before the release notes
    let rest = &line[VERSION_COMMENT.len()..];
    let version = match rest.find(' ') {
        Some(end) if end > 0 => &rest[..end],
        _ => "0.0",
    };
    Ok(version.to_string())
}

/// `generations,sound_chips,genre1[|genre2][,suffix]`
fn parse_values(msx_gen_id: u32, line: &str) -> ExtraData {
    let mut parts = line.splitn(4, ',');
    let generations = parts.next().map(parse_number).unwrap_or(0);
    let sound_chips = parts.next().map(parse_number).unwrap_or(0);
    let (genre1, genre2) = match parts.next() {
        Some(genres) => match genres.split_once('|') {
            Some((g1, g2)) => (parse_number(g1), parse_number(g2)),
            None => (parse_number(genres), 0),
        },
        None => (0, 0),
    };
    let suffix = parts.next().map(str::to_string);

    ExtraData {
        msx_gen_id,
        generations,
        sound_chips,
        genre1,
        genre2,
        suffix,
    }
}

/// Lenient number parsing; anything unparsable counts as 0.
fn parse_number(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}
