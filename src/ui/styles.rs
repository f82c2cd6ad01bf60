//! Inline style strings shared by the pages.

pub fn root_container_style() -> &'static str {
    "height: 100vh; display: flex; flex-direction: column; overflow: hidden; font-family: sans-serif; color: #222;"
}

pub fn page_body_style() -> &'static str {
    "flex: 1; min-height: 0; display: flex; flex-direction: column; gap: 8px; padding: 12px 16px; overflow: hidden;"
}

pub fn table_container_style() -> &'static str {
    "flex: 1; min-height: 0; overflow: auto; border: 1px solid #bbb;"
}

pub fn table_header_cell_style() -> &'static str {
    "position: sticky; top: 0; z-index: 2; border: 1px solid #bbb; padding: 6px; background: #f2f2f2; text-align: left; white-space: nowrap;"
}

pub fn table_cell_style() -> &'static str {
    "border: 1px solid #bbb; padding: 6px; vertical-align: top;"
}

pub fn button_style(primary: bool) -> &'static str {
    if primary {
        "border: 1px solid #2f6fde; background: #2f6fde; color: #fff; padding: 4px 12px; border-radius: 6px; cursor: pointer;"
    } else {
        "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;"
    }
}

pub fn input_style(invalid: bool) -> &'static str {
    if invalid {
        "width: 100%; box-sizing: border-box; padding: 4px 6px; border: 1px solid #d33; border-radius: 4px;"
    } else {
        "width: 100%; box-sizing: border-box; padding: 4px 6px; border: 1px solid #bbb; border-radius: 4px;"
    }
}

/// Background of the status badge and the toggle icon.
pub fn status_color(class: &str) -> &'static str {
    if class.contains("action-active") {
        "#2e7d32"
    } else if class.contains("action-inactive") {
        "#c62828"
    } else {
        "#333"
    }
}

/// Form grid cell for a field spanning `span` of 24 columns.
pub fn grid_cell_style(span: u8) -> String {
    format!("grid-column: span {}; display: flex; flex-direction: column; gap: 4px;", span.clamp(1, 24))
}
