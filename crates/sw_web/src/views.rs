use std::fmt::Write;

use sw_core::{Article, PriceTable};

/// Escape text for use inside HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 60rem; margin: 2rem auto; }}
table {{ border-collapse: collapse; }}
th, td {{ border: 1px solid #ccc; padding: 0.25rem 0.5rem; text-align: right; }}
th:first-child, td:first-child {{ text-align: left; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        body = body
    )
}

pub fn render_index(articles: &[Article]) -> String {
    let mut body = String::from("<h1>Articles</h1>\n");
    if articles.is_empty() {
        body.push_str("<p>No articles yet.</p>\n");
        return page("Articles", &body);
    }

    body.push_str("<ul>\n");
    for article in articles {
        let _ = writeln!(
            body,
            r#"<li><a href="/article/{id}">{title}</a> by {author} <small>{date}</small></li>"#,
            id = article.id,
            title = escape_html(&article.title),
            author = escape_html(&article.author),
            date = article.date_posted.format("%Y-%m-%d"),
        );
    }
    body.push_str("</ul>\n");
    page("Articles", &body)
}

/// Ticker-by-date table: one row per ticker, one column per date.
pub fn render_stock_table(table: &PriceTable) -> String {
    if table.is_empty() {
        return String::new();
    }

    let mut html = String::from("<table class=\"stock-data\">\n<thead><tr><th>Ticker</th>");
    for date in table.dates() {
        let _ = write!(html, "<th>{}</th>", date);
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in table.by_ticker() {
        let _ = write!(html, "<tr><td>{}</td>", escape_html(&row.ticker));
        for price in &row.prices {
            let _ = write!(html, "<td>{}</td>", price);
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

pub fn render_article(article: &Article, table: &PriceTable) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<p><a href=\"/\">&larr; All articles</a></p>");
    let _ = writeln!(body, "<h1>{}</h1>", escape_html(&article.title));
    let _ = writeln!(
        body,
        "<p class=\"byline\">{} &middot; {}</p>",
        escape_html(&article.author),
        article.date_posted.format("%Y-%m-%d %H:%M UTC")
    );

    for paragraph in article.content.split("\n\n").filter(|p| !p.trim().is_empty()) {
        let _ = writeln!(body, "<p>{}</p>", escape_html(paragraph.trim()));
    }

    body.push_str(&render_stock_table(table));
    page(&article.title, &body)
}
