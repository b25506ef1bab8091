//! Splicer: write documentation from a dump back into source text.
//!
//! Every import-mode record (top-level and nested) carries its own span and
//! canonical key. Records are processed from the highest span start to the
//! lowest, so a replacement of any length never shifts an offset that is still
//! waiting to be processed.

use crate::model::{DeclarationRecord, DocDictionary, Span};

/// Indentation of the line containing `offset`, or `""` if code precedes it.
fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &source[line_start..offset];
    if prefix.chars().all(char::is_whitespace) {
        prefix
    } else {
        ""
    }
}

/// Replacement text for one span: new documentation, then the declaration head
/// exactly as written in `source`.
fn replacement(source: &str, span: Span, documentation: &str, newline: &str) -> String {
    let separator = format!("{newline}{}", line_indent(source, span.head));
    let mut text = documentation
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(&separator);
    if !text.is_empty() {
        text.push_str(&separator);
    }
    text.push_str(&source[span.head..span.end]);
    text
}

/// Apply `dictionary` to `source`, consuming every matched entry.
///
/// `records` must come from an import-mode extraction of `source`. Entries
/// left in `dictionary` afterwards matched no declaration.
pub fn apply(source: &str, records: &[DeclarationRecord], dictionary: &mut DocDictionary) -> String {
    let mut targets: Vec<(&DeclarationRecord, Span)> = records
        .iter()
        .flat_map(DeclarationRecord::flatten)
        .filter_map(|record| record.span.map(|span| (record, span)))
        .collect();
    targets.sort_by(|a, b| b.1.start.cmp(&a.1.start));

    let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let mut result = source.to_string();
    let mut updated = 0;

    for (record, span) in targets {
        let key = &record.canonical_key;
        let Some(entry) = dictionary.remove(key) else {
            tracing::debug!(%key, kind = %record.kind, "no documentation for signature");
            continue;
        };
        if entry.documentation == record.documentation {
            tracing::debug!(%key, kind = %record.kind, "documentation unchanged");
            continue;
        }
        let text = replacement(source, span, &entry.documentation, newline);
        result.replace_range(span.start..span.end, &text);
        updated += 1;
        tracing::debug!(%key, kind = %record.kind, "updated documentation");
    }

    if !dictionary.is_empty() {
        let mut unmatched: Vec<&String> = dictionary.keys().collect();
        unmatched.sort();
        for key in unmatched {
            tracing::warn!(%key, "documentation matched no declaration");
        }
    }
    tracing::info!(updated, unmatched = dictionary.len(), "splice complete");

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclarationKind, DocEntry};
    use crate::parser::{dump, extract_source, ExtractMode, SourceParser};
    use crate::render::{dump::DumpRenderer, Renderer};

    fn records(source: &str, mode: ExtractMode) -> Vec<DeclarationRecord> {
        let mut parser = SourceParser::new().unwrap();
        extract_source(&mut parser, source, mode).unwrap()
    }

    fn merge(source: &str, dump_text: &str) -> (String, DocDictionary) {
        let mut dictionary = dump::parse(dump_text);
        let result = apply(source, &records(source, ExtractMode::Import), &mut dictionary);
        (result, dictionary)
    }

    const SOURCE: &str = "namespace Demo
{
    /// <summary>Old widget.</summary>
    [Serializable]
    public class Widget
    {
        /// <summary>Old add.</summary>
        public int Add(int a, int b)
        {
            return a + b;
        }

        public void Bar(int x) { }

        /// <summary>Keeps its docs.</summary>
        public void Bar(string x) { }
    }
}
";

    #[test]
    fn replaces_top_level_class_doc() {
        let (result, dict) = merge("/// old doc\nclass Foo { }", "/// new doc\nclass Foo");
        assert_eq!(result, "/// new doc\nclass Foo { }");
        assert!(dict.is_empty());
    }

    #[test]
    fn nested_replacements_keep_indentation() {
        let dump = "/// <summary>New widget.</summary>
/// <remarks>Two lines.</remarks>
public class Widget
{
    /// <summary>New add.</summary>
    public int Add(int a, int b)

    /// <summary>New bar.</summary>
    public void Bar(int x)

}
";
        let (result, dict) = merge(SOURCE, dump);
        assert!(dict.is_empty());
        assert!(result.contains(
            "    /// <summary>New widget.</summary>\n    /// <remarks>Two lines.</remarks>\n    [Serializable]\n    public class Widget\n"
        ));
        assert!(result.contains(
            "        /// <summary>New add.</summary>\n        public int Add(int a, int b)\n        {"
        ));
        assert!(result.contains(
            "        /// <summary>New bar.</summary>\n        public void Bar(int x) { }"
        ));
        assert!(result.contains("/// <summary>Keeps its docs.</summary>\n        public void Bar(string x)"));
        assert!(!result.contains("Old"));
    }

    #[test]
    fn unmatched_declaration_left_untouched() {
        let (result, _) = merge(SOURCE, "/// <summary>Other.</summary>\npublic void Baz()\n");
        assert_eq!(result, SOURCE);
    }

    #[test]
    fn unmatched_entries_stay_in_dictionary() {
        let (_, dict) = merge(SOURCE, "/// <summary>Other.</summary>\npublic void Baz()\n");
        assert_eq!(dict.len(), 1);
        assert!(dict.contains_key("publicvoidBaz()"));
    }

    #[test]
    fn round_trip_is_byte_identical() {
        let dump_text = DumpRenderer
            .render(&records(SOURCE, ExtractMode::Export))
            .unwrap();
        let (result, dict) = merge(SOURCE, &dump_text);
        assert_eq!(result, SOURCE);
        assert!(dict.is_empty());
    }

    #[test]
    fn class_edit_applies_when_first_member_is_undocumented() {
        let source = "/// <summary>Old.</summary>\npublic class C\n{\n    public void M() { }\n}\n";
        let dump_text = DumpRenderer
            .render(&records(source, ExtractMode::Export))
            .unwrap()
            .replace("Old.", "New.");
        let (result, dict) = merge(source, &dump_text);
        assert!(dict.is_empty());
        assert_eq!(result, source.replace("Old.", "New."));
    }

    #[test]
    fn nested_enums_and_interface_methods_are_reached() {
        let source = "public class Host
{
    /// <summary>Old mode.</summary>
    public enum Mode { On, Off }
}

public interface IShape
{
    double Area();
}
";
        let dump_text = "/// <summary>New mode.</summary>
public enum Mode

/// <summary>New area.</summary>
double Area()
";
        let (result, dict) = merge(source, dump_text);
        assert!(dict.is_empty());
        assert!(result.contains("    /// <summary>New mode.</summary>\n    public enum Mode { On, Off }"));
        assert!(result.contains("{\n    /// <summary>New area.</summary>\n    double Area();"));
        assert!(!result.contains("Old mode."));
    }

    #[test]
    fn second_application_is_a_no_op() {
        let mut dictionary = dump::parse("/// <summary>New add.</summary>\npublic int Add(int a, int b)\n");
        let first = apply(SOURCE, &records(SOURCE, ExtractMode::Import), &mut dictionary);
        assert_ne!(first, SOURCE);
        assert!(dictionary.is_empty());

        let second = apply(&first, &records(&first, ExtractMode::Import), &mut dictionary);
        assert_eq!(second, first);
    }

    #[test]
    fn longer_replacement_does_not_shift_earlier_spans() {
        let source = "/// a\nclass A { }\n/// b\nclass B { }\n";
        let dump_text = "/// a\nclass A\n\n/// b, now much longer\n/// and two lines\nclass B\n";
        let (result, _) = merge(source, dump_text);
        assert_eq!(
            result,
            "/// a\nclass A { }\n/// b, now much longer\n/// and two lines\nclass B { }\n"
        );
    }

    #[test]
    fn documentation_inserted_where_none_existed() {
        let source = "class C\n{\n    [Obsolete]\n    void M() { }\n}\n";
        let (result, _) = merge(source, "/// <summary>M.</summary>\nvoid M()\n");
        assert_eq!(
            result,
            "class C\n{\n    /// <summary>M.</summary>\n    [Obsolete]\n    void M() { }\n}\n"
        );
    }

    #[test]
    fn crlf_sources_keep_crlf() {
        let source = "/// old\r\nclass Foo { }\r\n";
        let (result, _) = merge(source, "/// new\n/// two\nclass Foo\n");
        assert_eq!(result, "/// new\r\n/// two\r\nclass Foo { }\r\n");
    }

    #[test]
    fn records_without_spans_are_ignored() {
        let mut dictionary = DocDictionary::new();
        dictionary.insert(
            "classFoo".to_string(),
            DocEntry {
                kind: DeclarationKind::Class,
                documentation: "/// new".to_string(),
                attributes: String::new(),
            },
        );
        let source = "/// old\nclass Foo { }";
        let result = apply(source, &records(source, ExtractMode::Export), &mut dictionary);
        assert_eq!(result, source);
        assert_eq!(dictionary.len(), 1);
    }

    #[test]
    fn indent_only_when_line_is_blank_before_offset() {
        assert_eq!(line_indent("a\n    b", 6), "    ");
        assert_eq!(line_indent("x = 1; class", 7), "");
        assert_eq!(line_indent("class", 0), "");
    }
}
