use super::{
    FigureSpec, Loading, cdn_figure_image, cdn_srcset, cdn_url, figure_image, render_figure,
};

#[test]
fn figure_image_roots_under_img() {
    let html = figure_image("photos/sunset.jpg", "Sunset", "A sunset over the bay");

    assert!(html.starts_with("<figure><img "));
    assert!(html.contains(r#"src="/img/photos/sunset.jpg""#));
    assert!(html.contains(r#"alt="Sunset""#));
    assert!(html.contains("<figcaption>A sunset over the bay</figcaption>"));
    assert!(html.ends_with("</figure>"));
}

#[test]
fn figure_image_tolerates_leading_slash() {
    let html = figure_image("/photos/sunset.jpg", "Sunset", "");
    assert!(html.contains(r#"src="/img/photos/sunset.jpg""#));
    assert!(!html.contains("figcaption"));
}

#[test]
fn figure_escapes_attribute_values() {
    let html = figure_image("a.png", r#"He said "hi""#, "<b>bold</b> claim");
    assert!(html.contains(r#"alt="He said &quot;hi&quot;""#));
    assert!(html.contains("<figcaption>&lt;b&gt;bold&lt;/b&gt; claim</figcaption>"));
}

#[test]
fn cdn_url_joins_cloud_transforms_and_path() {
    assert_eq!(
        cdn_url("demo", None, "sample.jpg"),
        "https://res.cloudinary.com/demo/image/upload/sample.jpg"
    );
    assert_eq!(
        cdn_url("demo", Some("w_800,q_auto"), "sample.jpg"),
        "https://res.cloudinary.com/demo/image/upload/w_800,q_auto/sample.jpg"
    );
    // Empty transforms behave like none at all.
    assert_eq!(
        cdn_url("demo", Some(""), "/sample.jpg"),
        "https://res.cloudinary.com/demo/image/upload/sample.jpg"
    );
}

#[test]
fn cdn_srcset_adds_retina_variant() {
    let srcset = cdn_srcset("demo", Some("w_800"), "sample.jpg");
    assert_eq!(
        srcset,
        "https://res.cloudinary.com/demo/image/upload/w_800/sample.jpg 1x, \
         https://res.cloudinary.com/demo/image/upload/w_800,dpr_2.0/sample.jpg 2x"
    );

    let srcset = cdn_srcset("demo", None, "sample.jpg");
    assert!(srcset.contains("/upload/dpr_2.0/sample.jpg 2x"));
}

#[test]
fn cdn_figure_image_carries_srcset() {
    let html = cdn_figure_image("demo", Some("w_800"), "sample.jpg", "Sample", "caption");
    assert!(html.contains(r#"src="https://res.cloudinary.com/demo/image/upload/w_800/sample.jpg""#));
    assert!(html.contains("srcset="));
    assert!(html.contains("dpr_2.0"));
    assert!(html.contains("<figcaption>caption</figcaption>"));
}

#[test]
fn render_figure_loading_attributes() {
    let eager = render_figure(&FigureSpec {
        src: "/img/a.png",
        srcset: None,
        alt: "a",
        title: "",
        loading: Loading::Eager,
        dimensions: Some((640, 480)),
        caption_html: "",
    });
    assert!(eager.contains(r#"loading="eager""#));
    assert!(eager.contains(r#"fetchpriority="high""#));
    assert!(eager.contains(r#"width="640" height="480""#));
    assert!(eager.contains(r#"decoding="async""#));

    let lazy = render_figure(&FigureSpec {
        src: "/img/a.png",
        srcset: None,
        alt: "a",
        title: "",
        loading: Loading::Lazy,
        dimensions: None,
        caption_html: "",
    });
    assert!(lazy.contains(r#"loading="lazy""#));
    assert!(!lazy.contains("fetchpriority"));
    assert!(!lazy.contains("width="));
}
