use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A fetched, decoded portal page. Queries parse on demand so the type stays
/// `Send` and can be carried across the crawl's await points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    url: String,
    html: String,
}

/// A CSS-selected slice of a page, still queryable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    url: String,
    html: String,
}

/// An anchor with its href resolved against the page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<TableCell>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub links: Vec<PageLink>,
}

impl Page {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Visible text of the whole page body, whitespace-collapsed.
    pub fn text(&self) -> String {
        let doc = Html::parse_document(&self.html);
        let body = selector("body").and_then(|sel| {
            doc.select(&sel)
                .next()
                .map(|el| collapse(el.text().collect::<String>().as_str()))
        });
        body.unwrap_or_else(|| collapse(&doc.root_element().text().collect::<String>()))
    }

    pub fn first_text(&self, css: &str) -> Option<String> {
        let doc = Html::parse_document(&self.html);
        let sel = selector(css)?;
        doc.select(&sel)
            .next()
            .map(|el| collapse(&el.text().collect::<String>()))
            .filter(|text| !text.is_empty())
    }

    pub fn fragments(&self, css: &str) -> Vec<Fragment> {
        let doc = Html::parse_document(&self.html);
        let Some(sel) = selector(css) else {
            return Vec::new();
        };
        doc.select(&sel)
            .map(|el| Fragment {
                url: self.url.clone(),
                html: el.html(),
            })
            .collect()
    }

    /// All anchors on the page, hrefs resolved to absolute URLs.
    pub fn links(&self) -> Vec<PageLink> {
        let doc = Html::parse_document(&self.html);
        collect_links(doc.root_element(), self.base().as_ref())
    }

    /// Header/data rows of the first table matching `css`.
    pub fn first_table(&self, css: &str) -> Option<Table> {
        let doc = Html::parse_document(&self.html);
        let table_sel = selector(css)?;
        let table = doc.select(&table_sel).next()?;
        let base = self.base();

        let row_sel = selector("tr")?;
        let th_sel = selector("th")?;
        let td_sel = selector("td")?;

        let mut rows = table.select(&row_sel);
        let header_row = rows.next()?;
        let headers = header_row
            .select(&th_sel)
            .map(|th| collapse(&th.text().collect::<String>()))
            .collect();
        let data = rows
            .map(|tr| {
                tr.select(&td_sel)
                    .map(|td| TableCell {
                        text: collapse(&td.text().collect::<String>()),
                        links: collect_links(td, base.as_ref()),
                    })
                    .collect()
            })
            .collect();

        Some(Table {
            headers,
            rows: data,
        })
    }

    fn base(&self) -> Option<Url> {
        Url::parse(&self.url).ok()
    }
}

impl Fragment {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn text(&self) -> String {
        let doc = Html::parse_fragment(&self.html);
        collapse(&doc.root_element().text().collect::<String>())
    }

    pub fn first_text(&self, css: &str) -> Option<String> {
        let doc = Html::parse_fragment(&self.html);
        let sel = selector(css)?;
        doc.select(&sel)
            .next()
            .map(|el| collapse(&el.text().collect::<String>()))
            .filter(|text| !text.is_empty())
    }

    pub fn fragments(&self, css: &str) -> Vec<Fragment> {
        let doc = Html::parse_fragment(&self.html);
        let Some(sel) = selector(css) else {
            return Vec::new();
        };
        doc.select(&sel)
            .map(|el| Fragment {
                url: self.url.clone(),
                html: el.html(),
            })
            .collect()
    }

    pub fn links(&self) -> Vec<PageLink> {
        let doc = Html::parse_fragment(&self.html);
        collect_links(doc.root_element(), Url::parse(&self.url).ok().as_ref())
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn collect_links(scope: ElementRef<'_>, base: Option<&Url>) -> Vec<PageLink> {
    let Some(sel) = selector("a") else {
        return Vec::new();
    };
    scope
        .select(&sel)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let href = resolve_href(href, base)?;
            Some(PageLink {
                href,
                text: collapse(&anchor.text().collect::<String>()),
            })
        })
        .collect()
}

/// Absolute URL for an href, or `None` for fragments and script pseudo-links.
fn resolve_href(reference: &str, base: Option<&Url>) -> Option<String> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with('?') || lower.starts_with("javascript:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url.into());
    }
    base.and_then(|base| base.join(trimmed).ok()).map(Into::into)
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
