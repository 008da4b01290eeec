//! File classification: which node shape a source file compiles into.

use crate::config;
use crate::helpers;

/// The closed set of shapes a file can become. Selection is a pure function
/// of the file name, so it is testable without a filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A server-side script (`Script`).
    ServerScript,
    /// A client-side script (`LocalScript`).
    LocalScript,
    /// Inline data carried as a `StringValue`.
    PlainValue,
    /// A numeric asset reference carried as an `IntValue`.
    Asset,
    /// Unrecognized content, preserved as a disabled commented-out script.
    Fallback,
}

/// A classification plus the node name derived from the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: FileKind,
    pub name: String,
}

/// Classify `file_name`.
///
/// Top-level entries whose stem matches a reserved entry name always become
/// the designated entry scripts, whatever the rest of the name says.
/// Otherwise the extension decides: source extensions dispatch on the
/// secondary extension (`server`/`client`/none), the asset extension becomes
/// an asset reference, and everything else falls back to a commented-out
/// placeholder.
pub fn classify(file_name: &str, is_top_level: bool) -> Classified {
    if is_top_level {
        let stem = helpers::entry_stem(file_name);
        if stem == config::SERVER_ENTRY_NAME {
            return Classified {
                kind: FileKind::ServerScript,
                name: stem.to_string(),
            };
        }
        if stem == config::CLIENT_ENTRY_NAME {
            return Classified {
                kind: FileKind::LocalScript,
                name: stem.to_string(),
            };
        }
    }

    match helpers::extension(file_name) {
        Some(ext) if helpers::is_source_extension(&ext) => match helpers::secondary_extension(file_name).as_deref() {
            Some("server") => Classified {
                kind: FileKind::ServerScript,
                name: helpers::script_name(file_name).to_string(),
            },
            Some("client") => Classified {
                kind: FileKind::LocalScript,
                name: helpers::script_name(file_name).to_string(),
            },
            _ => Classified {
                kind: FileKind::PlainValue,
                name: helpers::base_name(file_name).to_string(),
            },
        },
        Some(ext) if ext == config::ASSET_EXTENSION => Classified {
            kind: FileKind::Asset,
            name: helpers::base_name(file_name).to_string(),
        },
        _ => Classified {
            kind: FileKind::Fallback,
            name: helpers::base_name(file_name).to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(kind: FileKind, name: &str) -> Classified {
        Classified {
            kind,
            name: name.to_string(),
        }
    }

    #[test]
    fn dispatches_on_the_secondary_extension() {
        assert_eq!(classify("script.server.lua", false), classified(FileKind::ServerScript, "script"));
        assert_eq!(classify("gui.client.lua", false), classified(FileKind::LocalScript, "gui"));
        assert_eq!(classify("module.lua", false), classified(FileKind::PlainValue, "module"));
        assert_eq!(classify("data.txt", false), classified(FileKind::PlainValue, "data"));
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert_eq!(classify("script.SERVER.LUA", false), classified(FileKind::ServerScript, "script"));
        assert_eq!(classify("DATA.TXT", false), classified(FileKind::PlainValue, "DATA"));
    }

    #[test]
    fn asset_extension_becomes_an_asset_reference() {
        assert_eq!(classify("icon.asset", false), classified(FileKind::Asset, "icon"));
    }

    #[test]
    fn unknown_and_missing_extensions_fall_back() {
        assert_eq!(classify("readme.md", false), classified(FileKind::Fallback, "readme"));
        assert_eq!(classify("Makefile", false), classified(FileKind::Fallback, "Makefile"));
    }

    #[test]
    fn reserved_stems_win_at_the_top_level_regardless_of_extension() {
        assert_eq!(classify("Server.txt", true), classified(FileKind::ServerScript, "Server"));
        assert_eq!(classify("Server.weird", true), classified(FileKind::ServerScript, "Server"));
        assert_eq!(classify("Client.md", true), classified(FileKind::LocalScript, "Client"));
    }

    #[test]
    fn reserved_stems_are_ordinary_names_below_the_top_level() {
        assert_eq!(classify("Server.txt", false), classified(FileKind::PlainValue, "Server"));
        assert_eq!(classify("Client.md", false), classified(FileKind::Fallback, "Client"));
    }

    #[test]
    fn a_dotted_base_keeps_its_inner_dots() {
        assert_eq!(classify("a.b.txt", false), classified(FileKind::PlainValue, "a.b"));
    }
}
