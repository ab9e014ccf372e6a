//! Standalone HTML rendering.
//!
//! A single self-contained document with inline styles and base64
//! embedded images, suitable for printing or sharing as one file.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use fabula_core::{Scene, Story};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Render a story to a standalone HTML document.
///
/// `images` maps zero-based scene index to raw image bytes; resolved
/// images are embedded as `data:` URLs.
pub(crate) fn render(story: &Story, images: &BTreeMap<u32, Vec<u8>>) -> String {
    let characters = story
        .characters
        .iter()
        .map(|c| {
            format!(
                r#"<div class="character"><strong>{}:</strong> {}</div>"#,
                escape(&c.name),
                escape(&c.description)
            )
        })
        .collect::<String>();

    let mut scenes = String::new();
    for (index, scene) in story.scenes.iter().enumerate() {
        let image = images.get(&(index as u32)).map(|bytes| {
            format!("data:image/png;base64,{}", STANDARD.encode(bytes))
        });
        let _ = write!(scenes, "{}", scene_html(scene, index, image.as_deref()));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
{styles}
</head>
<body>
    <div class="container">
        <header>
            <h1>{title}</h1>
            <p class="meta">Genre: {genre} | Age Group: {age_group}</p>
        </header>

        <section class="characters">
            <h2>Characters</h2>
            {characters}
        </section>

        <div class="scenes">
            {scenes}
        </div>

        <footer>
            <p>Generated with Fabula</p>
            <p>{date}</p>
        </footer>
    </div>
</body>
</html>"#,
        title = escape(&story.title),
        genre = story.genre,
        age_group = story.age_group,
        date = Utc::now().format("%B %d, %Y"),
        styles = STYLES,
    )
}

fn scene_html(scene: &Scene, index: usize, image_data: Option<&str>) -> String {
    let image_html = image_data
        .map(|data| {
            format!(
                r#"<img src="{data}" alt="Scene {}" class="scene-image">"#,
                index + 1
            )
        })
        .unwrap_or_default();

    format!(
        r#"
        <div class="scene">
            <h3>{}</h3>
            {image_html}
            <p class="scene-text">{}</p>
        </div>
"#,
        escape(&scene.title),
        escape(&scene.text)
    )
}

/// Minimal HTML escaping for text content and attribute values.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const STYLES: &str = r#"    <style>
        body {
            font-family: 'Georgia', serif;
            line-height: 1.6;
            color: #333;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
        }
        .container {
            background: white;
            border-radius: 12px;
            padding: 40px;
            box-shadow: 0 10px 30px rgba(0,0,0,0.2);
        }
        h1 {
            color: #6366f1;
            text-align: center;
            font-size: 2.5rem;
            margin-bottom: 10px;
        }
        h2 {
            color: #8b5cf6;
            border-bottom: 2px solid #e5e7eb;
            padding-bottom: 10px;
        }
        h3 {
            color: #8b5cf6;
            text-align: center;
            font-size: 1.5rem;
            margin-top: 40px;
        }
        .meta {
            text-align: center;
            color: #6b7280;
            font-style: italic;
        }
        .characters {
            background: #f3f4f6;
            padding: 20px;
            border-radius: 8px;
            margin: 30px 0;
        }
        .character {
            margin-bottom: 10px;
        }
        .scene {
            margin-bottom: 50px;
            page-break-after: always;
        }
        .scene-image {
            width: 100%;
            max-width: 600px;
            margin: 20px auto;
            display: block;
            border-radius: 8px;
            box-shadow: 0 4px 10px rgba(0,0,0,0.1);
        }
        .scene-text {
            text-align: justify;
            font-size: 16px;
            line-height: 1.8;
        }
        footer {
            text-align: center;
            margin-top: 50px;
            padding-top: 20px;
            border-top: 1px solid #e5e7eb;
            color: #6b7280;
        }
        @media print {
            body {
                background: white;
            }
            .container {
                box-shadow: none;
            }
        }
    </style>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_core::{AgeGroup, ArtStyle, AspectRatio, Genre};

    fn sample_story() -> Story {
        let mut story = Story::new(
            "The <Fox> & Friends",
            "prompt",
            2,
            AgeGroup::Middle,
            Genre::Adventure,
            ArtStyle::Watercolor,
            AspectRatio::Wide,
        );
        story
            .push_scene(Scene::new(1, "Dawn", "Once upon a time.", "p", vec![]))
            .unwrap();
        story
    }

    #[test]
    fn renders_escaped_title_and_scene() {
        let html = render(&sample_story(), &BTreeMap::new());
        assert!(html.contains("The &lt;Fox&gt; &amp; Friends"));
        assert!(html.contains("<h3>Dawn</h3>"));
        assert!(!html.contains("scene-image"));
    }

    #[test]
    fn embeds_images_as_data_urls() {
        let mut images = BTreeMap::new();
        images.insert(0, vec![1, 2, 3]);
        let html = render(&sample_story(), &images);
        assert!(html.contains("data:image/png;base64,AQID"));
    }
}
