use crate::nest::path::{GroupAccumulators, HeaderPath};
use crate::nest::prune::prune_document;
use crate::nest::types::{Layout, NestConfig};
use serde_json::{Map, Value};

/// Turns a header row plus data rows into JSON documents
pub struct SheetNester {
    config: NestConfig,
}

impl SheetNester {
    pub fn new(config: NestConfig) -> Self {
        SheetNester { config }
    }

    /// The layout used for these headers: forced by config or detected
    pub fn layout<H: AsRef<str>>(&self, headers: &[H]) -> Layout {
        self.config
            .layout
            .unwrap_or_else(|| Layout::detect(headers, self.config.separator))
    }

    /// Transform a sheet.
    ///
    /// Flat sheets yield one object per row. Structured sheets yield a single
    /// document built from every row.
    pub fn transform<H, R, C>(&self, headers: &[H], rows: &[R]) -> Vec<Value>
    where
        H: AsRef<str>,
        R: AsRef<[C]>,
        C: AsRef<str>,
    {
        let layout = self.layout(headers);
        log::debug!(
            "{} headers, {} rows, layout {:?}",
            headers.len(),
            rows.len(),
            layout
        );

        match layout {
            Layout::Flat => self.flat_rows(headers, rows),
            Layout::Structured => vec![self.structured_document(headers, rows)],
        }
    }

    /// One object per row, headers used verbatim as keys
    fn flat_rows<H, R, C>(&self, headers: &[H], rows: &[R]) -> Vec<Value>
    where
        H: AsRef<str>,
        R: AsRef<[C]>,
        C: AsRef<str>,
    {
        rows.iter()
            .map(|row| {
                let cells = row.as_ref();
                let mut object = Map::new();
                for (idx, header) in headers.iter().enumerate() {
                    let cell = cells.get(idx).map(|c| c.as_ref()).unwrap_or("");
                    object.insert(header.as_ref().to_string(), Value::String(cell.to_string()));
                }
                Value::Object(object)
            })
            .collect()
    }

    /// A single document shared by all rows
    fn structured_document<H, R, C>(&self, headers: &[H], rows: &[R]) -> Value
    where
        H: AsRef<str>,
        R: AsRef<[C]>,
        C: AsRef<str>,
    {
        let paths: Vec<HeaderPath> = headers
            .iter()
            .map(|h| HeaderPath::parse_with(h.as_ref(), self.config.separator))
            .collect();

        let mut assembly = Assembly::new(&paths);
        for (idx, row) in rows.iter().enumerate() {
            log::trace!("row {}: {} cells", idx + 1, row.as_ref().len());
            assembly.absorb_row(row.as_ref());
        }

        Value::Object(assembly.finish())
    }
}

impl Default for SheetNester {
    fn default() -> Self {
        SheetNester::new(NestConfig::default())
    }
}

/// Working state of one structured transform
struct Assembly<'a> {
    paths: &'a [HeaderPath],
    document: Map<String, Value>,
    groups: GroupAccumulators,
}

impl<'a> Assembly<'a> {
    fn new(paths: &'a [HeaderPath]) -> Self {
        Assembly {
            paths,
            document: Map::new(),
            groups: GroupAccumulators::new(),
        }
    }

    /// Apply a row's cells in header order. Cells past the last header and
    /// empty cells contribute nothing.
    fn absorb_row<C: AsRef<str>>(&mut self, cells: &[C]) {
        for (path, cell) in self.paths.iter().zip(cells) {
            let value = cell.as_ref();
            if value.is_empty() {
                continue;
            }
            path.apply(&mut self.document, value, &mut self.groups);
        }
    }

    fn finish(self) -> Map<String, Value> {
        let Assembly {
            mut document,
            groups,
            ..
        } = self;

        log::debug!("{} array groups collected", groups.len());
        groups.merge_into(&mut document);

        prune_document(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nest(headers: &[&str], rows: &[Vec<&str>]) -> Vec<Value> {
        SheetNester::default().transform(headers, rows)
    }

    #[test]
    fn test_flat_rows() {
        let output = nest(
            &["name", "email"],
            &[vec!["Alice", "a@example.com"], vec!["Bob", ""]],
        );

        assert_eq!(output, vec![
            json!({"name": "Alice", "email": "a@example.com"}),
            json!({"name": "Bob", "email": ""}),
        ]);
    }

    #[test]
    fn test_flat_keeps_header_order() {
        let output = nest(&["z", "a", "m"], &[vec!["1", "2", "3"]]);
        let keys: Vec<&String> = output[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_flat_length_mismatch() {
        let output = nest(&["a", "b"], &[vec!["1"], vec!["1", "2", "3"]]);

        assert_eq!(output, vec![
            json!({"a": "1", "b": ""}),
            json!({"a": "1", "b": "2"}),
        ]);
    }

    #[test]
    fn test_flat_no_rows() {
        assert!(nest(&["a"], &[]).is_empty());
    }

    #[test]
    fn test_structured_single_document() {
        let output = nest(
            &["name", "address.city", "address.zip"],
            &[vec!["Alice", "Paris", "75001"]],
        );

        assert_eq!(output, vec![json!({
            "name": "Alice",
            "address": {"city": "Paris", "zip": "75001"}
        })]);
    }

    #[test]
    fn test_structured_rows_share_document() {
        let output = nest(
            &["site.title", "site.lang"],
            &[vec!["Home", ""], vec!["", "en"]],
        );

        assert_eq!(output, vec![json!({"site": {"title": "Home", "lang": "en"}})]);
    }

    #[test]
    fn test_structured_later_rows_overwrite() {
        let output = nest(&["a.b"], &[vec!["first"], vec!["second"]]);
        assert_eq!(output, vec![json!({"a": {"b": "second"}})]);
    }

    #[test]
    fn test_array_group_packing_across_rows() {
        let output = nest(
            &["tags[name]", "tags[value]"],
            &[vec!["x", "1"], vec!["y", "2"]],
        );

        assert_eq!(output, vec![json!({
            "tags": [
                {"name": "x", "value": "1"},
                {"name": "y", "value": "2"}
            ]
        })]);
    }

    #[test]
    fn test_array_group_same_row_restart() {
        let output = nest(&["tags[name]", "tags[name]"], &[vec!["x", "y"]]);
        assert_eq!(output, vec![json!({"tags": [{"name": "x"}, {"name": "y"}]})]);
    }

    #[test]
    fn test_array_group_partial_rows() {
        let output = nest(
            &["tags[name]", "tags[value]"],
            &[vec!["x", ""], vec!["", "1"], vec!["y"]],
        );

        // Empty cells are skipped, so the second row's value lands on the
        // first element.
        assert_eq!(output, vec![json!({
            "tags": [{"name": "x", "value": "1"}, {"name": "y"}]
        })]);
    }

    #[test]
    fn test_nested_array_group() {
        let output = nest(
            &["page.title", "page.links[label]", "page.links[href]"],
            &[vec!["Home", "Docs", "/docs"], vec!["", "Blog", "/blog"]],
        );

        assert_eq!(output, vec![json!({
            "page": {
                "title": "Home",
                "links": [
                    {"label": "Docs", "href": "/docs"},
                    {"label": "Blog", "href": "/blog"}
                ]
            }
        })]);
    }

    #[test]
    fn test_empty_cells_create_nothing() {
        let output = nest(&["name", "a.b"], &[vec!["Alice", ""], vec!["Bob", ""]]);
        assert_eq!(output, vec![json!({"name": "Bob"})]);
        assert!(output[0].get("a").is_none());
    }

    #[test]
    fn test_unused_group_is_dropped() {
        let output = nest(&["name", "tags[name]"], &[vec!["Alice", ""], vec!["Bob"]]);
        assert_eq!(output, vec![json!({"name": "Bob"})]);
    }

    #[test]
    fn test_structured_no_rows() {
        let output = nest(&["a.b"], &[]);
        assert_eq!(output, vec![json!({})]);
    }

    #[test]
    fn test_numeric_headers_are_keys() {
        let output = nest(&["2024.q1", "0"], &[vec!["10", "zero"]]);
        assert_eq!(output, vec![json!({"2024": {"q1": "10"}, "0": "zero"})]);
    }

    #[test]
    fn test_extra_cells_ignored() {
        let output = nest(&["a.b"], &[vec!["1", "2", "3"]]);
        assert_eq!(output, vec![json!({"a": {"b": "1"}})]);
    }

    #[test]
    fn test_forced_layout() {
        let config = NestConfig {
            layout: Some(Layout::Flat),
            ..NestConfig::default()
        };
        let output = SheetNester::new(config).transform(&["a.b"], &[vec!["1"]]);
        assert_eq!(output, vec![json!({"a.b": "1"})]);

        let config = NestConfig {
            layout: Some(Layout::Structured),
            ..NestConfig::default()
        };
        let output = SheetNester::new(config).transform(&["a", "b"], &[vec!["1", ""]]);
        assert_eq!(output, vec![json!({"a": "1"})]);
    }

    #[test]
    fn test_custom_separator() {
        let config = NestConfig {
            separator: '/',
            ..NestConfig::default()
        };
        let output = SheetNester::new(config).transform(&["a/b.c"], &[vec!["1"]]);
        assert_eq!(output, vec![json!({"a": {"b.c": "1"}})]);
    }

    #[test]
    fn test_unclosed_bracket_header_nests_by_separator() {
        let output = nest(&["a[b.c"], &[vec!["v"]]);
        assert_eq!(output, vec![json!({"a[b": {"c": "v"}})]);

        let output = nest(&["x.a[b.c", "x.id"], &[vec!["v", "1"]]);
        assert_eq!(output, vec![json!({"x": {"a[b": {"c": "v"}, "id": "1"}})]);
    }
}
