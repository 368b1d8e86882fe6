// =============================================================================
// Markdown transform — narrative prose to report markup
// =============================================================================
//
// A minimal line-oriented transform, not a markdown grammar. Supported:
// headings h1-h4, **bold** / __bold__, *italic* / _italic_, unordered lists
// (- / *), ordered lists (1.), blank-line paragraph breaks, `inline code`.
// Nested or overlapping constructs are not guaranteed to round-trip.
//
// Pass order matters and mirrors the precedence of the markers: headings
// before emphasis (so a heading's text can carry bold), bold before italic
// (so ** is not eaten as two *), list passes over whole lines, paragraph
// breaks and code spans last.
// =============================================================================

/// Translate narrative markdown into the report's HTML subset.
pub fn markdown_to_html(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let html = convert_headings(markdown);
    let html = replace_paired(&html, "**", "<strong>", "</strong>");
    let html = replace_paired(&html, "__", "<strong>", "</strong>");
    let html = replace_paired(&html, "*", "<em>", "</em>");
    let html = replace_paired(&html, "_", "<em>", "</em>");
    let html = convert_unordered_lists(&html);
    let html = convert_ordered_lists(&html);
    let html = html.replace("\n\n", "<br><br>");
    replace_paired(&html, "`", "<code>", "</code>")
}

fn convert_headings(text: &str) -> String {
    let mut out = Vec::with_capacity(text.lines().count());
    for line in text.lines() {
        // Most specific marker first so "####" is not matched as "#".
        let converted = ["#### ", "### ", "## ", "# "]
            .iter()
            .find_map(|marker| {
                line.strip_prefix(marker).map(|rest| {
                    let level = marker.len() - 1;
                    format!("<h{level}>{rest}</h{level}>")
                })
            })
            .unwrap_or_else(|| line.to_string());
        out.push(converted);
    }
    out.join("\n")
}

/// Replace non-overlapping `marker ... marker` pairs with open/close tags.
/// Pairs never span lines, so list bullets on adjacent lines are not eaten
/// as emphasis. An unpaired trailing marker is left untouched.
fn replace_paired(text: &str, marker: &str, open: &str, close: &str) -> String {
    text.lines()
        .map(|line| replace_paired_in_line(line, marker, open, close))
        .collect::<Vec<_>>()
        .join("\n")
}

fn replace_paired_in_line(line: &str, marker: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = rest.find(marker) {
        let after_open = &rest[start + marker.len()..];
        // Require a non-empty span, like the `(.+?)` pattern it replaces.
        let Some(end) = after_open
            .find(marker)
            .filter(|&end| end > 0)
        else {
            break;
        };

        out.push_str(&rest[..start]);
        out.push_str(open);
        out.push_str(&after_open[..end]);
        out.push_str(close);
        rest = &after_open[end + marker.len()..];
    }

    out.push_str(rest);
    out
}

fn convert_unordered_lists(text: &str) -> String {
    convert_lists(text, "ul", |stripped| {
        (stripped.starts_with("- ") || stripped.starts_with("* "))
            .then(|| stripped[2..].trim().to_string())
    })
}

fn convert_ordered_lists(text: &str) -> String {
    convert_lists(text, "ol", |stripped| {
        let digits = stripped.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let rest = stripped[digits..].strip_prefix('.')?;
        let item = rest.strip_prefix(char::is_whitespace)?;
        Some(item.trim().to_string())
    })
}

fn convert_lists(
    text: &str,
    tag: &str,
    item_of: impl Fn(&str) -> Option<String>,
) -> String {
    let mut out = Vec::new();
    let mut in_list = false;

    for line in text.lines() {
        match item_of(line.trim()) {
            Some(item) => {
                if !in_list {
                    out.push(format!("<{tag}>"));
                    in_list = true;
                }
                out.push(format!("<li>{item}</li>"));
            }
            None => {
                if in_list {
                    out.push(format!("</{tag}>"));
                    in_list = false;
                }
                out.push(line.to_string());
            }
        }
    }
    if in_list {
        out.push(format!("</{tag}>"));
    }

    out.join("\n")
}
