//! Edge case tests for fif-dom
//!
//! Document structure, mounting/unmounting subtrees, queries.

use fif_dom::*;

// ============================================================================
// DOCUMENT STRUCTURE
// ============================================================================

#[test]
fn test_document_skeleton() {
    let doc = Document::new("https://example.com/");
    let tree = doc.tree();

    assert_eq!(doc.url(), "https://example.com/");
    assert_eq!(tree.children(tree.root()), &[doc.document_element()]);
    assert_eq!(tree.children(doc.document_element()), &[doc.head(), doc.body()]);
    assert_eq!(tree.element(doc.body()).unwrap().tag, "body");
}

#[test]
fn test_get_element_by_id() {
    let mut doc = Document::default();
    let body = doc.body();
    let host = doc.append_element(body, "div").unwrap();
    doc.tree_mut().set_attribute(host, "id", "search").unwrap();

    assert_eq!(doc.get_element_by_id("search"), Some(host));
    assert_eq!(doc.get_element_by_id("missing"), None);
}

// ============================================================================
// MOUNT / UNMOUNT
// ============================================================================

#[test]
fn test_unmount_restores_host_children() {
    let mut doc = Document::default();
    let body = doc.body();
    let host = doc.append_element(body, "div").unwrap();
    let original = doc.append_element(host, "p").unwrap();
    doc.tree_mut().set_text_content(original, "keep me").unwrap();
    let before = doc.tree().outer_html(host);
    let live_before = doc.tree().live_count();

    let form = doc.append_element(host, "form").unwrap();
    let input = doc.append_element(form, "input").unwrap();
    assert!(doc.tree().contains(host, input));

    doc.tree_mut().remove(form).unwrap();
    assert_eq!(doc.tree().outer_html(host), before);
    assert_eq!(doc.tree().live_count(), live_before);
    assert!(!doc.tree().is_live(input));
}

#[test]
fn test_prepend_goes_first() {
    let mut doc = Document::default();
    let body = doc.body();
    let first = doc.append_element(body, "main").unwrap();
    let region = doc.tree_mut().create_element("div");
    doc.tree_mut().prepend_child(body, region).unwrap();

    assert_eq!(doc.tree().children(body), &[region, first]);
}

#[test]
fn test_attribute_on_text_node_fails() {
    let mut doc = Document::default();
    let text = doc.tree_mut().create_text("hi");
    assert_eq!(
        doc.tree_mut().set_attribute(text, "id", "x"),
        Err(DomError::InvalidNodeType(text))
    );
}

#[test]
fn test_root_cannot_be_removed() {
    let mut doc = Document::default();
    let root = doc.tree().root();
    assert!(doc.tree_mut().remove(root).is_err());
}

// ============================================================================
// QUERIES
// ============================================================================

#[test]
fn test_query_selector_all_by_tag_and_class() {
    let mut doc = Document::default();
    let body = doc.body();
    let a = doc.append_element(body, "section").unwrap();
    let b = doc.append_element(body, "section").unwrap();
    doc.tree_mut().add_class(b, "search-host").unwrap();

    assert_eq!(doc.query_selector_all("section"), vec![a, b]);
    assert_eq!(doc.query_selector_all(".search-host"), vec![b]);
    assert!(doc.query_selector_all("section > p").is_empty());
}

#[test]
fn test_removed_nodes_not_queried() {
    let mut doc = Document::default();
    let body = doc.body();
    let host = doc.append_element(body, "div").unwrap();
    doc.tree_mut().set_attribute(host, "id", "gone").unwrap();
    doc.tree_mut().remove(host).unwrap();

    assert_eq!(doc.get_element_by_id("gone"), None);
}
