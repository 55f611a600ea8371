//! `inspect` command: load and index the page once.

use std::fmt::Write;

use anyhow::Result;

use crate::actor::patch::fetch_page;
use crate::config::AgentConfig;
use crate::dom::Page;
use crate::reload::fetch::HttpFetcher;
use crate::reload::patch::PatchCoordinator;

pub fn run_inspect(config: &AgentConfig, html: bool) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let fetcher = HttpFetcher::new(&config.server.url)?;
    let mut page = rt.block_on(fetch_page(&fetcher, &config.server.page))?;

    let mut coordinator = PatchCoordinator::new(&config.dom, &config.patch);
    coordinator.index_page(&mut page)?;

    if html {
        println!("{}", page.to_html());
    } else {
        print!("{}", format_table(&page, &coordinator, &config.dom.path_attr));
    }
    Ok(())
}

/// One row per tracked element in document order, then a summary line.
fn format_table(page: &Page, coordinator: &PatchCoordinator, path_attr: &str) -> String {
    let mut out = String::new();
    let mut paths: Vec<&str> = Vec::new();

    for node in page.elements() {
        let Some(path) = page.attr(node, path_attr) else {
            continue;
        };
        if !paths.contains(&path) {
            paths.push(path);
        }
        let index = coordinator
            .indexes()
            .get(node)
            .map_or_else(|| "-".to_string(), |i| i.to_string());
        let tag = page.tag(node).unwrap_or("?");
        let _ = writeln!(out, "{path:<24} {index:>4}  <{tag}>");
    }

    let tracked: usize = paths
        .iter()
        .map(|path| page.elements_where(path_attr, path).len())
        .sum();
    let _ = writeln!(out, "{} tracked elements across {} paths", tracked, paths.len());
    out
}
