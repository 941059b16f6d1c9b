//! Page extraction rules.
//!
//! Each function takes a page body and returns a fully built record. A
//! selector that matches nothing leaves its field at the default (empty
//! string, zero, `None`); extraction itself never fails. The selectors are
//! the whole contract with the remote markup, so they are kept verbatim.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::reconstruct::{fill_year_gaps, reconstruct_histogram, StackedBar};
use crate::models::{CitationYearCount, CoauthorLink, Publication, PublicationDetail, ScholarProfile};
use crate::utils::{absolute_url, grab_id, leading_number, parse_count};

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\(]?\d").expect("valid regex"));

static TRAILING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",?\s*\d{4}\s*$").expect("valid regex"));

static CITES_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cites=(\d+)").expect("valid regex"));

static VIEW_PUBID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"citation_for_view=[^:&]*:([^&#]+)").expect("valid regex"));

static AFTER_COLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":(.+)$").expect("valid regex"));

static Z_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"z-index:\s*(\d+)").expect("valid regex"));

static YEAR_LOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"as_ylo=(\d{4})").expect("valid regex"));

/// Label text that marks the sort control mixed in with coauthor links
const SORT_CONTROL_LABEL: &str = "Sort by";

fn select<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(e) => {
            tracing::debug!("Unusable selector {}: {:?}", css, e);
            Vec::new()
        }
    }
}

fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    select(scope, css).into_iter().next()
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(scope: ElementRef, css: &str) -> String {
    select_first(scope, css).map(text_of).unwrap_or_default()
}

fn attr_of(element: ElementRef, name: &str) -> Option<String> {
    element.value().attr(name).map(str::to_string)
}

fn digits_only(text: &str) -> Option<&str> {
    let text = text.trim();
    (!text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())).then_some(text)
}

/// Extract a profile page. `base_url` resolves site-relative coauthor links.
pub fn profile(html: &str, scholar_id: &str, base_url: &str) -> ScholarProfile {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut profile = ScholarProfile::new(scholar_id);
    profile.name = first_text(root, "#gsc_prf_in");
    profile.affiliation = first_text(root, "div.gsc_prf_il");
    profile.fields = select(root, "a.gsc_prf_inta")
        .into_iter()
        .map(text_of)
        .collect();
    profile.homepage = select_first(root, "#gsc_prf_ivh a").and_then(|a| attr_of(a, "href"));

    for row in select(root, "#gsc_rsb_st tr") {
        let cells = select(row, "td");
        if cells.len() < 2 {
            continue;
        }
        let label = text_of(cells[0]).to_lowercase();
        let value = parse_count(&text_of(cells[1]));

        if label.contains("citations") {
            profile.total_cites = value;
        } else if label.contains("h-index") {
            profile.h_index = value;
        } else if label.contains("i10-index") {
            profile.i10_index = value;
        }
    }

    profile.coauthors = coauthor_links_in(root, base_url);
    profile.available =
        select_first(root, "div.gsc_rsb_m_a").and_then(|el| leading_number(&text_of(el)));
    profile.not_available =
        select_first(root, "div.gsc_rsb_m_na").and_then(|el| leading_number(&text_of(el)));

    if profile.name.is_empty() {
        tracing::debug!("No name found on profile page for {}", scholar_id);
    }

    profile
}

/// Coauthor links on a profile page, in page order
fn coauthor_links_in(root: ElementRef, base_url: &str) -> Vec<CoauthorLink> {
    select(root, r#"a[tabindex="-1"]"#)
        .into_iter()
        .filter_map(|a| {
            let name = text_of(a);
            if name.is_empty() || name.contains(SORT_CONTROL_LABEL) {
                return None;
            }
            let href = attr_of(a, "href").unwrap_or_default();
            Some(CoauthorLink {
                name,
                id: grab_id(&href),
                url: absolute_url(base_url, &href),
            })
        })
        .collect()
}

/// Extract every row of a publication-list page, in document order
pub fn publication_rows(html: &str) -> Vec<Publication> {
    let document = Html::parse_document(html);
    select(document.root_element(), "tr.gsc_a_tr")
        .into_iter()
        .map(publication_row)
        .collect()
}

fn publication_row(row: ElementRef) -> Publication {
    let mut publication = Publication::default();

    if let Some(title) = select_first(row, ".gsc_a_at") {
        publication.title = text_of(title);
        publication.pubid = attr_of(title, "href")
            .as_deref()
            .and_then(pubid_from_link)
            .unwrap_or_default();
    }

    if let Some(count) = select_first(row, ".gsc_a_ac") {
        publication.cites = parse_count(&text_of(count));
        publication.cid = attr_of(count, "href")
            .and_then(|href| CITES_PARAM.captures(&href).map(|caps| caps[1].to_string()))
            .unwrap_or_default();
    }

    publication.year = digits_only(&first_text(row, ".gsc_a_y span")).and_then(|y| y.parse().ok());

    let grey = select(row, "td .gs_gray");
    publication.author = grey.first().map(|el| text_of(*el)).unwrap_or_default();
    let details = grey.get(1).map(|el| text_of(*el)).unwrap_or_default();

    let (journal, number) = split_venue(&details);
    publication.journal = journal;
    publication.number = number;

    publication
}

/// The publication id carried by a title link: the part of its
/// `citation_for_view` value after the colon.
pub fn pubid_from_link(href: &str) -> Option<String> {
    VIEW_PUBID
        .captures(href)
        .or_else(|| AFTER_COLON.captures(href))
        .map(|caps| caps[1].to_string())
}

/// Split a details line into venue and volume/issue/pages.
///
/// The split happens at the first digit (or a bracket directly before one).
/// The venue loses trailing commas; the number loses a trailing four-digit year.
pub fn split_venue(details: &str) -> (String, String) {
    let Some(first) = FIRST_NUMBER.find(details) else {
        return (
            details.trim().trim_end_matches(',').trim_end().to_string(),
            String::new(),
        );
    };

    let journal = details[..first.start()]
        .trim()
        .trim_end_matches(',')
        .trim_end()
        .to_string();

    let number = details[first.start()..].trim().trim_end_matches(',').trim_end();
    let number = TRAILING_YEAR
        .replace(number, "")
        .trim()
        .trim_end_matches(',')
        .to_string();

    (journal, number)
}

/// Extract a publication detail page
pub fn publication_detail(html: &str) -> PublicationDetail {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let labels = select(root, "div.gsc_oci_field");
    let values = select(root, "div.gsc_oci_value");

    PublicationDetail {
        fields: labels
            .into_iter()
            .zip(values)
            .map(|(label, value)| (text_of(label), text_of(value)))
            .collect(),
        r#abstract: first_text(root, "div.gsh_csp"),
        url: select_first(root, "a.gsc_oci_title_link")
            .and_then(|a| attr_of(a, "href"))
            .unwrap_or_default(),
    }
}

/// The first field value of a detail page, which is its full author list
pub fn detail_authors(html: &str) -> String {
    let document = Html::parse_document(html);
    first_text(document.root_element(), ".gsc_oci_value")
}

/// Extract the profile-level yearly citation histogram
pub fn citation_histogram(html: &str) -> Vec<CitationYearCount> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let years: Vec<i32> = select(root, "span.gsc_g_t")
        .into_iter()
        .filter_map(|el| digits_only(&text_of(el)).and_then(|y| y.parse().ok()))
        .collect();

    let labels: Vec<u64> = select(root, "span.gsc_g_al")
        .into_iter()
        .filter_map(|el| digits_only(&text_of(el)).and_then(|v| v.parse().ok()))
        .collect();

    let bars: Vec<StackedBar> = select(root, "a.gsc_g_a")
        .into_iter()
        .map(|bar| StackedBar {
            z_index: bar
                .value()
                .attr("style")
                .and_then(|style| Z_INDEX.captures(style))
                .and_then(|caps| caps[1].parse().ok()),
            value: select_first(bar, ".gsc_g_al")
                .and_then(|el| digits_only(&text_of(el)).and_then(|v| v.parse().ok())),
        })
        .collect();

    reconstruct_histogram(&years, &labels, &bars)
}

/// Extract a single article's yearly citation history
pub fn article_citation_history(html: &str) -> Vec<CitationYearCount> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let years: Vec<i32> = select(root, ".gsc_oci_g_a")
        .into_iter()
        .filter_map(|a| {
            a.value()
                .attr("href")
                .and_then(|href| YEAR_LOW.captures(href))
                .and_then(|caps| caps[1].parse().ok())
        })
        .collect();

    let counts: Vec<u64> = select(root, ".gsc_oci_g_al")
        .into_iter()
        .map(|el| parse_count(&text_of(el)))
        .collect();

    let samples: Vec<(i32, u64)> = years.into_iter().zip(counts).collect();
    fill_year_gaps(&samples)
}
