//! HTML rendering for the listing and error pages.

use listing::{EntryKind, ListEntry};
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::config::PageConfig;
use crate::i18n::Translation;

const FONT_AWESOME: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/5.15.4/css/all.min.css";

const BASE_CSS: &str = "*,::after,::before{box-sizing:border-box}\
html{line-height:1.15;-webkit-text-size-adjust:100%;-webkit-tap-highlight-color:transparent}\
body{margin:20px;font-size:1rem;font-weight:400;line-height:1.5;background-color:#f9f9f9;color:#333}\
h1{margin-top:0;margin-bottom:.5rem;font-size:2.5rem;font-weight:500;line-height:1.2;text-align:center;color:#555}\
a{text-decoration:none;color:#007bff;font-weight:700;background-color:transparent}\
a:hover{color:#0056b3;text-decoration:underline}\
input{margin:0;font-size:inherit;line-height:inherit;overflow:visible}\
.table-container{max-width:100%;margin:0 auto;overflow-x:auto}\
table{border-collapse:collapse;width:100%;background-color:#fff;box-shadow:0 0 10px rgba(0,0,0,.1);margin-bottom:20px}\
.table{color:#212529}\
.table td,.table th{padding:12px;vertical-align:top;text-align:start;border-bottom:1px solid #ddd}\
.table thead th{vertical-align:bottom;border-bottom:2px solid #dee2e6}\
.table-striped tbody tr:nth-of-type(odd){background-color:rgba(0,0,0,.05)}\
.table-hover tbody tr:hover{background-color:rgba(0,0,0,.075)}\
th{background-color:#f2f2f2;cursor:pointer}\
th.sortable:hover{background-color:#e0e0e0}\
.icon{text-align:center;width:30px}\
.search-bar{margin-bottom:20px;text-align:center}\
.search-bar input[type=\"text\"]{width:300px;max-width:80%;padding:10px;border:1px solid #ddd;border-radius:4px}\
@media(max-width:576px){.search-bar input[type=\"text\"]{width:80%}}\
@media print{thead{display:table-header-group}tr{page-break-inside:avoid}.table td,.table th{background-color:#fff!important}}";

const LISTING_JS: &str = r##"
function sortTable(column) {
    const tbody = document.getElementById("fileTableBody");
    const rows = Array.from(tbody.rows).filter(row => !row.classList.contains("parent-directory"));
    const parent = tbody.querySelector("tr.parent-directory");
    const sameColumn = column === window.lastSortedColumn;
    const descending = sameColumn && window.lastSortOrder === "asc";
    const key = row => {
        const cell = row.cells[column];
        if (column === 2) {
            const size = parseFloat(cell.dataset.bytes);
            return isNaN(size) ? -1 : size;
        }
        if (column === 3) {
            const time = cell.querySelector("time");
            return time ? new Date(time.getAttribute("datetime")).getTime() : 0;
        }
        return cell.innerText.toLowerCase();
    };
    rows.sort((a, b) => {
        const x = key(a);
        const y = key(b);
        const order = x > y ? 1 : x < y ? -1 : 0;
        return descending ? -order : order;
    });
    rows.forEach(row => tbody.appendChild(row));
    if (parent) {
        tbody.prepend(parent);
    }
    window.lastSortedColumn = column;
    window.lastSortOrder = descending ? "desc" : "asc";
}
function filterTable(text) {
    const needle = text.toLowerCase();
    document.querySelectorAll("#fileTableBody tr").forEach(row => {
        row.style.display = row.cells[1].innerText.toLowerCase().includes(needle) ? "" : "none";
    });
}
document.querySelectorAll(".local-time").forEach(element => {
    const date = new Date(element.getAttribute("datetime"));
    element.textContent = isNaN(date.getTime()) ? "" : date.toLocaleString();
});
"##;

/// Request-scoped values the page needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// `Host` header as sent by the client, possibly with a port.
    pub host: String,
    /// `{scheme}://{host}/`, used for `og:url`.
    pub url_root: String,
}

impl PageContext {
    pub fn new(scheme: &str, host: &str) -> Self {
        Self {
            host: host.to_string(),
            url_root: format!("{}://{}/", scheme, host),
        }
    }

    /// Host name without port and top-level label, labels joined by spaces.
    ///
    /// `files.example.com:8080` becomes `files example`.
    pub fn site_name(&self) -> String {
        let hostname = self.host.split(':').next().unwrap_or_default();
        let labels: Vec<&str> = hostname.split('.').collect();
        labels[..labels.len().saturating_sub(1)].join(" ")
    }
}

/// Strip characters that could leave the CSS declaration they are placed in.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}' | ';'))
        .collect()
}

/// Render the listing page for one directory.
pub fn render_listing(
    ctx: &PageContext,
    settings: &PageConfig,
    lang: &str,
    text: &Translation,
    entries: &[ListEntry],
) -> Markup {
    let site_name = ctx.site_name();
    let title = if site_name.is_empty() {
        text.directory_listing.clone()
    } else {
        format!("{} - {}", text.directory_listing, site_name)
    };
    let css = format!(
        "{}body{{font-family:{}}}",
        BASE_CSS,
        css_value(&settings.font_family)
    );

    html! {
        (DOCTYPE)
        html dir=(text.head.dir) lang=(lang) {
            head {
                meta charset="UTF-8";
                title { (text.directory_listing) }
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="title" content=(title);
                meta name="description" content=(text.head.description);
                meta name="theme-color" content=(settings.theme_color);
                meta property="og:title" content=(title);
                meta property="og:description" content=(text.head.description);
                meta property="og:type" content="article";
                meta property="og:url" content=(ctx.url_root);
                @if let Some(favicon) = &settings.favicon {
                    meta property="og:image" content=(favicon);
                    link rel="icon" href="/favicon.ico";
                }
                meta property="og:site_name" content=(site_name);
                meta property="og:locale" content=(lang);
                link href=(FONT_AWESOME) rel="stylesheet";
                style { (PreEscaped(css)) }
            }
            body {
                h1 { (text.directory_listing) }
                div.search-bar {
                    input type="text" oninput="filterTable(this.value)" placeholder=(text.body.search_placeholder);
                }
                div.table-container {
                    table.table.table-hover.table-striped {
                        thead {
                            tr {
                                th.icon { (text.body.file) }
                                th.sortable onclick="sortTable(1)" { (text.body.name) }
                                th.sortable onclick="sortTable(2)" { (text.body.size) }
                                th.sortable onclick="sortTable(3)" { (text.body.last_modified) }
                            }
                        }
                        tbody id="fileTableBody" {
                            @for entry in entries {
                                (render_row(entry))
                            }
                        }
                    }
                }
                script { (PreEscaped(LISTING_JS)) }
            }
        }
    }
}

fn render_row(entry: &ListEntry) -> Markup {
    let bytes = entry.size.as_deref().map(size_sort_key);
    html! {
        tr.parent-directory[entry.kind == EntryKind::ParentDirectory] {
            td.icon { i class=(entry.icon.css_class()) {} }
            td { a href=(entry.link) { (entry.name) } }
            td data-bytes=[bytes] { (entry.size.as_deref().unwrap_or_default()) }
            td {
                @if let Some(modified) = &entry.modified {
                    time.local-time datetime=(modified) { (modified) }
                }
            }
        }
    }
}

/// Approximate byte count of a formatted size, for client-side sorting.
fn size_sort_key(formatted: &str) -> String {
    let split = formatted
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(formatted.len());
    let (number, unit) = formatted.split_at(split);
    let exponent = listing::size::SIZE_UNITS
        .iter()
        .position(|u| *u == unit)
        .unwrap_or(0);
    let value: f64 = number.parse().unwrap_or(0.0);
    format!("{:.0}", value * 1024f64.powi(exponent as i32))
}

/// Minimal error page used when no external error site is configured.
pub fn render_error(code: u16, reason: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                title { (code) " " (reason) }
            }
            body style="font-family: sans-serif; text-align: center; margin-top: 10%;" {
                h1 { (code) }
                p { (reason) }
            }
        }
    }
}
