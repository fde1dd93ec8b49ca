//! Layout components - page shell, cards, form controls

/// Escapes text for safe inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders a complete HTML document around the given body.
///
/// Styling comes from the Tailwind CDN; the page needs no static assets.
pub fn base_page(title: &str, body: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-900 text-gray-100 min-h-screen">
    <main class="max-w-xl mx-auto px-4 py-12">
        <h1 class="text-3xl font-bold text-white mb-8">{title}</h1>
        {body}
    </main>
</body>
</html>"#
    )
}

/// Renders a card container with an optional header.
pub fn card(title: Option<&str>, content: &str) -> String {
    let header_html = title
        .map(|t| {
            format!(
                r#"<h3 class="text-lg font-semibold text-white mb-4">{}</h3>"#,
                escape_html(t)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="bg-gray-800 border border-gray-700 rounded-lg p-6 mb-6">
            {header_html}
            {content}
        </div>"#
    )
}

/// Renders a badge showing whether an unlock credential is stored.
///
/// Never shows the credential itself.
pub fn status_badge(configured: bool) -> String {
    let (classes, label) = if configured {
        ("bg-green-900 text-green-300", "Real-Debrid key configured")
    } else {
        ("bg-gray-700 text-gray-300", "No Real-Debrid key, peer-to-peer only")
    };

    format!(r#"<span class="inline-block px-3 py-1 rounded-full text-sm {classes}">{label}</span>"#)
}

/// Renders a button with Tailwind styling.
///
/// Variants are `primary` and `secondary`; anything else renders neutral.
pub fn button(text: &str, variant: &str, attributes: Option<&str>) -> String {
    let base_classes = "px-4 py-2 rounded-lg font-medium transition-colors";

    let variant_classes = match variant {
        "primary" => "bg-blue-600 hover:bg-blue-700 text-white",
        "secondary" => "bg-gray-700 hover:bg-gray-600 text-white",
        _ => "bg-gray-600 hover:bg-gray-700 text-white",
    };

    let attrs = attributes.unwrap_or("");

    format!(r#"<button class="{base_classes} {variant_classes}" {attrs}>{text}</button>"#)
}

/// Renders an input field with Tailwind styling.
pub fn input(name: &str, placeholder: &str, input_type: &str, attributes: Option<&str>) -> String {
    let attrs = attributes.unwrap_or("");

    format!(
        r#"<input type="{input_type}" name="{name}" placeholder="{placeholder}"
                  class="w-full px-4 py-2 mb-4 bg-gray-700 border border-gray-600 rounded-lg text-white placeholder-gray-400"
                  {attrs} />"#
    )
}
