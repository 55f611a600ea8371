//! Stylesheet Swap
//!
//! Replaces the active stylesheet element in `<head>` with a fresh
//! `<style>` holding the fetched CSS. Full replace, never a diff.

use thiserror::Error;

use super::fetch::{Fetch, FetchError};
use crate::config::StylesheetConfig;
use crate::dom::{DomError, Element, NodeId, Page};

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("no <link href=\"{href}\"> or <style id=\"{style_id}\"> in <head>")]
    TargetNotFound { href: String, style_id: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Locate the swap target: a `<link>` to the stylesheet or a previously
/// injected `<style>`.
pub fn find_target(page: &Page, config: &StylesheetConfig) -> Option<NodeId> {
    let head = page.head()?;
    page.children(head).iter().copied().find(|&node| match page.tag(node) {
        Some("link") => page.attr(node, "href") == Some(config.href.as_str()),
        Some("style") => page.attr(node, "id") == Some(config.style_id.as_str()),
        _ => false,
    })
}

/// Fetch the stylesheet and swap it in. Returns the new `<style>` node.
pub async fn swap_stylesheet<F: Fetch>(
    page: &mut Page,
    fetcher: &F,
    config: &StylesheetConfig,
) -> Result<NodeId, StyleError> {
    let target = find_target(page, config).ok_or_else(|| StyleError::TargetNotFound {
        href: config.href.clone(),
        style_id: config.style_id.clone(),
    })?;

    let css = fetcher.fetch(&config.href).await?;

    // Built directly so the CSS never passes through the HTML parser.
    let mut style = Element::new("style");
    style.attrs.push(("id".to_string(), Some(config.style_id.clone())));
    Ok(page.replace_with_text_element(target, style, &format!("\n{css}\n"))?)
}
