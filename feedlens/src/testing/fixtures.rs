//! Synthetic pages for extraction and scheduling tests.

/// Wraps body markup in a complete document.
#[must_use]
pub fn page_html(body: &str) -> String {
    format!("<!DOCTYPE html><html><head><title>Fixture</title></head><body>{body}</body></html>")
}

/// A title of exactly `len` characters (at least the numbered prefix).
#[must_use]
pub fn padded_title(index: usize, len: usize) -> String {
    let mut title = format!("Result number {index} ");
    while title.chars().count() < len {
        title.push('x');
    }
    title
}

/// An Amazon search page with one result card per title, inside the
/// container the scheduler watches.
#[must_use]
pub fn amazon_search_page(titles: &[&str]) -> String {
    let cards: String = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            format!(
                r#"<div data-component-type="s-search-result"><h2><a href="/dp/B{i:04}"><span>{title}</span></a></h2></div>"#
            )
        })
        .collect();
    page_html(&format!(r#"<div class="s-main-slot">{cards}</div>"#))
}

/// A repeating `ul > li > a` result list, the shape the heuristic extractor
/// looks for.
#[derive(Debug, Clone)]
pub struct ResultListFixture {
    count: usize,
    title_len: usize,
    heading: bool,
    href_base: String,
}

impl ResultListFixture {
    /// `count` same-site results with 20-character titles.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            count,
            title_len: 20,
            heading: false,
            href_base: "/item".to_string(),
        }
    }

    /// Sets the title length in characters.
    #[must_use]
    pub fn with_title_len(mut self, len: usize) -> Self {
        self.title_len = len;
        self
    }

    /// Wraps every link in an `h3`.
    #[must_use]
    pub fn with_heading(mut self, heading: bool) -> Self {
        self.heading = heading;
        self
    }

    /// Sets the href prefix; an absolute URL makes the links cross-site.
    #[must_use]
    pub fn with_href_base(mut self, base: impl Into<String>) -> Self {
        self.href_base = base.into();
        self
    }

    /// The title of result `index`.
    #[must_use]
    pub fn title(&self, index: usize) -> String {
        padded_title(index, self.title_len)
    }

    /// The list items without the enclosing `ul`.
    #[must_use]
    pub fn items_html(&self) -> String {
        (0..self.count)
            .map(|i| {
                let link = format!(r#"<a href="{}/{i}">{}</a>"#, self.href_base, self.title(i));
                let link = if self.heading {
                    format!("<h3>{link}</h3>")
                } else {
                    link
                };
                format!("<li>{link}<p>Description for result {i}</p></li>")
            })
            .collect()
    }

    /// The list as a `ul`.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!("<ul>{}</ul>", self.items_html())
    }
}
