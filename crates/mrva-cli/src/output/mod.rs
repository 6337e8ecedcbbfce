use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod summary;
pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Table options from the current terminal preferences.
pub fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut grid = match serde_json::to_value(value)? {
        Value::Array(items) => array_table(&items),
        Value::Object(map) => {
            let mut grid = table::Table::new(["key", "value"]);
            for (key, value) in map {
                grid.push([key, value_to_cell(&value)]);
            }
            grid
        }
        scalar => {
            let mut grid = table::Table::new(["value"]);
            grid.push([value_to_cell(&scalar)]);
            grid
        }
    };
    if grid.is_empty() {
        grid = table::Table::new(["(no rows)"]);
    }
    Ok(grid.render(table_options()))
}

fn array_table(items: &[Value]) -> table::Table {
    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    if headers.is_empty() {
        let mut grid = table::Table::new(["value"]);
        for item in items {
            grid.push([value_to_cell(item)]);
        }
        return grid;
    }

    let mut grid = table::Table::new(headers.clone());
    for map in items.iter().filter_map(Value::as_object) {
        grid.push(
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), value_to_cell)),
        );
    }
    grid
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        name: &'static str,
        runs: u32,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Example { name: "s1", runs: 3 };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["name"], "s1");
        assert_eq!(parsed["runs"], 3);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = Example { name: "s1", runs: 3 };
        let out = render(&value, OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn array_of_objects_renders_one_row_each() {
        let value = vec![
            Example { name: "a", runs: 1 },
            Example { name: "b", runs: 2 },
        ];
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("name"));
        assert!(lines[0].contains("runs"));
    }

    #[test]
    fn empty_array_says_so() {
        let value: Vec<Example> = Vec::new();
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        assert!(out.contains("(no rows)"));
    }
}
