/// Basic HTML shell shared by article pages.
pub fn page_shell(
    head_common: &str,
    head_fragment: &str,
    body_header: &str,
    body: &str,
    footer: &str,
) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head_common}
{head_fragment}
</head>
<body>
<article>
<section>
{body_header}
{body}
</section>
</article>
</body>
{footer}
</html>
"#
    )
}

/// Render a listing page given its heading, pre-rendered body, shared head
/// includes, and the per-page head fragment (title/meta/structured data).
pub fn listing_page(
    heading: &str,
    body: &str,
    head_common: &str,
    head_fragment: &str,
    href_prefix: &str,
) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head_common}
{head_fragment}
<link rel="stylesheet" href="{href_prefix}style.css">
</head>
<body>
<article>
<section>
<h1>{heading}</h1>
{body}
</section>
</article>
</body>
</html>
"#
    )
}
