use super::*;
use crate::wikitext::{
    HeadingLevel, NodeKind,
    builder::{
        container, heading, html, link, list, list_item, node, node_with_text, root, template,
        template_with,
    },
};

const BASE_DIR: &str = "./src/renderer/tests";

macro_rules! golden_tests {
    ($($name:ident),* $(,)?) => {
        $(#[test]
        fn $name() {
            run_golden_test(
                stringify!($name),
                include_str!(concat!("./fixtures/", stringify!($name), ".json"))
            );
        })*
    }
}

#[track_caller]
fn run_golden_test(test_name: &str, input: &str) {
    use std::io::Write as _;

    let _ = env_logger::try_init();

    let tree = serde_json::from_str::<Node>(input).unwrap();
    let mut mint = goldenfile::Mint::new(format!("{BASE_DIR}/goldenfiles"));
    let mut file = mint.new_goldenfile(format!("{test_name}.html")).unwrap();
    let result = Renderer::new(&CONFIG).render_document(&tree).unwrap();
    let _ = writeln!(file, "{result}");
}

golden_tests! {
    article,
    markup,
}

#[track_caller]
fn render_one(node: &Node) -> String {
    Renderer::new(&CONFIG).render_node(node).unwrap()
}

#[test]
fn text() {
    assert_eq!(
        render_one(&root(vec!["see [[Paris]]".into()])),
        "see [<noinclude/>[Paris]<noinclude/>]",
        "wikilink brackets should be broken up"
    );
    assert_eq!(
        render_one(&root(vec![r#"a<ref name="n">b</ref>c"#.into()])),
        "ac",
        "citations should be removed with their content"
    );
    assert_eq!(
        render_one(&root(vec![r#"a<ref name="n" />c"#.into()])),
        "ac",
        "self-closing citations should be removed"
    );
    assert_eq!(
        render_one(&root(vec!["<references />".into()])),
        "<references />",
        "only citation tags are removed"
    );
}

#[test]
fn headings() {
    assert_eq!(
        render_one(&heading(HeadingLevel::H2, "History", vec!["\nText.\n".into()])),
        "<h2>History</h2>Text."
    );
    assert_eq!(
        render_one(&heading(HeadingLevel::H6, "Deep", vec![])),
        "<h6>Deep</h6>"
    );
}

#[test]
fn elided_headings() {
    let levels = [
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
        HeadingLevel::H6,
    ];
    for title in crate::config::ELIDED_HEADINGS.iter() {
        for level in levels {
            let tree = root(vec![
                "Intro".into(),
                heading(
                    level,
                    title,
                    vec!["\n".into(), list(vec![list_item("*", vec!["secret".into()])]).into()],
                )
                .into(),
            ]);
            let out = Renderer::new(&CONFIG).render_document(&tree).unwrap();
            assert_eq!(out, "Intro", "{title} at {level:?} should be dropped");
        }
    }
}

#[test]
fn horizontal_line() {
    assert_eq!(
        render_one(&Node::new(NodeKind::HorizontalLine)),
        "",
        "a lone break is a leading break"
    );
    assert_eq!(
        render_one(&list_item(
            ":",
            vec!["a".into(), Node::new(NodeKind::HorizontalLine).into(), "b".into()]
        )),
        "<li>ab</li>"
    );
}

#[test]
fn break_collapsing() {
    assert_eq!(
        render_one(&root(vec![
            "a".into(),
            "<br>".into(),
            "<br>".into(),
            "<br>".into(),
            "b".into(),
        ])),
        "a<br>b",
        "three breaks should collapse to one"
    );
    assert_eq!(
        render_one(&root(vec!["\n\n".into(), "a".into()])),
        "a",
        "leading breaks should be removed"
    );
    assert_eq!(
        Renderer::new(&CONFIG)
            .render_document(&root(vec![
                container(NodeKind::Bold, vec!["a\n\n".into()]).into(),
                "\n\nb".into(),
            ]))
            .unwrap(),
        "<b>a<br></b><br>b"
    );
}

#[test]
fn lists() {
    assert_eq!(
        render_one(&list(vec![
            list_item("*", vec!["one".into()]),
            list_item("*", vec!["two".into(), "\n".into()]),
        ])),
        "<ul><li>one</li><li>two</li></ul>"
    );
    assert_eq!(
        render_one(&list(vec![list_item("**", vec!["one".into()])])),
        "<ol><li>one</li></ol>"
    );
    assert_eq!(
        render_one(&list(vec![list_item("#", vec!["one".into()])])),
        "<ul><li>one</li></ul>",
        "other markers default to an unordered list"
    );
    assert_eq!(
        render_one(&list(vec![
            list_item(";", vec!["Term".into()]),
            list_item(":", vec!["Definition".into()]),
        ])),
        "<ul>Term<li>Definition</li></ul>",
        "definition terms are not wrapped"
    );
    assert_eq!(
        render_one(&list_item("*", vec!["a".into(), "<br>".into(), "b".into()])),
        "<li>ab</li>",
        "bare breaks inside items are discarded"
    );
    assert_eq!(
        render_one(&container(NodeKind::List, vec![])),
        "<ul></ul>",
        "empty list"
    );
}

#[test]
fn preformatted() {
    assert_eq!(
        render_one(&container(NodeKind::PreformattedBlock, vec!["x = 1".into()])),
        "<pre>x = 1</pre>"
    );
    assert_eq!(
        render_one(&container(NodeKind::PreformattedInline, vec!["x = 1".into()])),
        "x = 1"
    );
}

#[test]
fn links() {
    assert_eq!(render_one(&link("Paris", vec![])), r#"<a href="">Paris</a>"#);
    assert_eq!(
        render_one(&link("巴黎", vec![vec!["Paris".into()]])),
        r#"<a href="">Paris</a>"#,
        "display text overrides the target"
    );
    assert_eq!(
        render_one(&link("Paris", vec![vec!["City".into()], vec![" ".into()]])),
        r#"<a href="">City</a>"#,
        "blank groups are ignored"
    );
    assert_eq!(
        render_one(&node(
            NodeKind::Link,
            vec![vec!["Paris".into()]],
            vec!["ian".into()]
        )),
        r#"<a href="">Paris</a>ian"#,
        "children follow the anchor"
    );
    assert_eq!(
        render_one(&link(
            "Paris",
            vec![vec![
                Node::new(NodeKind::Bold).into(),
                container(NodeKind::Italic, vec!["City".into()]).into(),
            ]]
        )),
        r#"<a href=""><b></b><i>City</i></a>"#,
        "display text nodes are rendered"
    );
    assert_eq!(render_one(&link("", vec![vec!["x".into()]])), "");
    assert_eq!(
        render_one(&Node::new(NodeKind::Link)),
        "",
        "link without any groups"
    );
}

#[test]
fn media_and_category_links() {
    for target in ["File:Paris.jpg", "Category:Capitals", "file:Paris.jpg"] {
        let media = node(
            NodeKind::Link,
            vec![
                vec![target.into()],
                vec!["thumb".into()],
                vec![link("Paris", vec![]).into()],
            ],
            vec!["trail".into()],
        );
        let out = render_one(&root(vec![media.into()]));
        assert!(!out.contains("<a"), "{target} should not render: {out}");
        assert_eq!(out, "");
    }
}

#[test]
fn template_argument() {
    assert_eq!(
        render_one(&node(
            NodeKind::TemplateArgument,
            vec![vec!["1".into()], vec!["default".into()]],
            vec![]
        )),
        "{{{1|default}}}"
    );
}

#[test]
fn dropped_kinds() {
    for kind in [
        NodeKind::Url,
        NodeKind::Table,
        NodeKind::TableCaption,
        NodeKind::TableRow,
        NodeKind::TableHeaderCell,
        NodeKind::TableCell,
    ] {
        assert_eq!(
            render_one(&container(kind.clone(), vec!["content".into()])),
            "",
            "{kind} should be dropped"
        );
    }
}

#[test]
fn magic_word() {
    assert_eq!(
        render_one(&node_with_text(NodeKind::MagicWord, "__TOC__", vec![])),
        "__TOC__"
    );
}

#[test]
fn html_elements() {
    assert_eq!(
        render_one(&html("span", &[("class", "x"), ("id", "y")], vec!["a".into()])),
        r#"<span class="x" id="y">a</span>"#
    );
    assert_eq!(
        render_one(&html("br", &[("clear", "all")], vec![])),
        r#"<br clear="all">"#
    );
    assert_eq!(
        render_one(&html("hr", &[("class", "x")], vec![])),
        r#"<hr class="x">"#
    );
    assert_eq!(render_one(&html("div", &[], vec![])), "<div />");
    assert_eq!(
        render_one(&html("span", &[("title", r#"say "hi""#)], vec!["x".into()])),
        r#"<span title="say &quot;hi&quot;">x</span>"#
    );
    assert_eq!(
        render_one(&html("ref", &[("name", "a")], vec!["cite".into()])),
        "",
        "citation elements are dropped"
    );
}

#[test]
fn styles() {
    assert_eq!(
        render_one(&container(
            NodeKind::Bold,
            vec![
                "a".into(),
                container(NodeKind::Italic, vec!["b".into()]).into()
            ]
        )),
        "<b>a<i>b</i></b>"
    );
}

#[test]
fn unknown_kind() {
    let tree = root(vec![
        "fine".into(),
        heading(
            HeadingLevel::H2,
            "A",
            vec![Node::new(NodeKind::Unknown("LANGUAGE_CONVERTER".into())).into()],
        )
        .into(),
    ]);
    let err = Renderer::new(&CONFIG).render_document(&tree).unwrap_err();
    assert!(
        matches!(&err, Error::UnknownKind(kind) if kind == "LANGUAGE_CONVERTER"),
        "{err}"
    );
}

#[test]
fn handler_replaces_nodes() {
    let handler = |node: &Node| -> Option<Vec<Content>> {
        match node.macro_name() {
            Some("Infobox") => Some(vec!["[infobox]".into()]),
            Some("Nested") => Some(vec![
                "(".into(),
                template("Infobox", &[]).into(),
                link("Paris", vec![]).into(),
                ")".into(),
            ]),
            _ => None,
        }
    };
    let mut renderer = Renderer::new(&CONFIG).with_handler(&handler);
    assert_eq!(
        renderer.render_node(&template("Infobox", &["a", "b"])).unwrap(),
        "[infobox]"
    );
    assert_eq!(
        renderer
            .render_node(&root(vec![template("Nested", &[]).into()]))
            .unwrap(),
        r#"([infobox]<a href="">Paris</a>)"#,
        "replacement content is rendered, including nodes"
    );
    assert_eq!(
        renderer.render_node(&template("bd", &["1900", "1950"])).unwrap(),
        "1900-1950",
        "declined nodes render normally"
    );
}

#[test]
fn handler_returning_same_node() {
    let handler = |node: &Node| Some(vec![Content::Node(node.clone())]);
    let tree = root(vec![container(NodeKind::Bold, vec!["x".into()]).into()]);
    assert_eq!(
        render(&tree, Some(&handler as &dyn NodeHandler)).unwrap(),
        "<b>x</b>",
        "returning the node itself renders it normally"
    );
}

#[test]
fn catalog() {
    let mut catalog = TemplateCatalog::new();
    let tree = root(vec![
        template("bd", &["1900", "1950"]).into(),
        template("bd", &["1800", "1850"]).into(),
        template_with(
            "lang-en",
            vec![vec![template("le", &["a", "b"]).into()]],
        )
        .into(),
        template("人文学科", &[]).into(),
    ]);
    let out = Renderer::new(&CONFIG)
        .with_catalog(&mut catalog)
        .render_document(&tree)
        .unwrap();
    assert_eq!(out, "1900-19501800-1850a(b)");
    assert_eq!(catalog.len(), 3, "{catalog:?}");
    assert!(catalog.get("bd", 3).unwrap().contains("1900"));
    assert!(catalog.get("lang-en", 2).is_some());
    assert!(catalog.get("le", 3).is_some(), "nested calls are recorded");
}
