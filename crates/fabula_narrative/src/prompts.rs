//! Prompt builders for story and image generation.

use fabula_core::{Scene, Story, StoryChoice};
use std::fmt::Write as _;

/// System prompt for the opening of a new story.
///
/// The model is told to produce exactly one scene; continuations are
/// generated later from reader choices.
pub(crate) fn initial_story(age_group: &str, genre: &str, total_scenes: u32) -> String {
    format!(
        r#"You are a creative children's story writer. Generate the OPENING of a story suitable for {age_group} year olds.
Genre: {genre}

IMPORTANT: Generate ONLY the first scene to establish the story. The story will eventually have {total_scenes} scenes total, but ALL remaining scenes will be created dynamically based on reader choices.

Return the story setup in JSON format with the following structure:
{{
    "title": "Story Title",
    "characters": [
        {{
            "name": "Character Name",
            "description": "Physical appearance and personality",
            "visual_description": "Detailed visual description for image generation",
            "role": "main/supporting"
        }}
    ],
    "scenes": [
        {{
            "scene_number": 1,
            "title": "Opening Scene Title",
            "text": "Opening scene narrative text (2-3 paragraphs) that sets up the story",
            "image_prompt": "Detailed description for image generation",
            "characters_present": ["Character names in this scene"]
        }}
    ]
}}

Guidelines:
- Generate ONLY ONE scene (the opening scene)
- Keep language age-appropriate
- Include vivid descriptions for visual generation
- Create an engaging opening that hooks the reader
- Set up the story premise clearly
- Output ONLY valid JSON"#
    )
}

/// Prompt asking for four branching choices after a scene.
pub(crate) fn story_choices(current_scene: &str, genre: &str, age_group: &str) -> String {
    format!(
        r#"Based on this current scene: {current_scene}

Generate 4 different story path choices for what happens next.
Genre: {genre}
Age group: {age_group}

Return JSON with this structure:
[
    {{
        "title": "Original Path",
        "description": "Continue with the main storyline",
        "icon": "📖",
        "type": "original",
        "preview": "Brief preview of what happens if this choice is selected"
    }},
    {{
        "title": "Magical Twist",
        "description": "Add a magical element",
        "icon": "✨",
        "type": "magical",
        "preview": "Brief preview"
    }},
    {{
        "title": "Surprise Turn",
        "description": "Unexpected twist",
        "icon": "🎭",
        "type": "surprise",
        "preview": "Brief preview"
    }},
    {{
        "title": "Adventure Path",
        "description": "New adventure",
        "icon": "🚀",
        "type": "adventure",
        "preview": "Brief preview"
    }}
]

Make the first choice follow the original story path, and make the other three creative alternatives.
Keep descriptions brief and age-appropriate. Output ONLY valid JSON."#
    )
}

/// One line per scene, truncated, for continuation context.
pub(crate) fn summarize_scenes(scenes: &[Scene]) -> String {
    let mut summary = String::new();
    for scene in scenes {
        let text: String = scene.text.chars().take(100).collect();
        let _ = writeln!(summary, "Scene {}: {} - {}...", scene.scene_number, scene.title, text);
    }
    summary
}

/// Prompt for the next scene of a story, steered by a reader choice.
///
/// Pacing guidance tightens as the scene budget runs out so the story
/// lands on a real ending rather than stopping mid-arc.
pub(crate) fn next_scene(story: &Story, choice: &StoryChoice) -> String {
    let scene_number = story.next_scene_number();
    let remaining = story.remaining_scenes();

    let character_info = story
        .characters
        .iter()
        .map(|c| format!("- {}: {}", c.name, c.effective_description()))
        .collect::<Vec<_>>()
        .join("\n");

    let scenes_summary = summarize_scenes(&story.scenes);
    let preview = choice.preview.as_deref().unwrap_or("");

    format!(
        r#"Story title: {title}
Current scene: {scene_number} of {total}
Remaining scenes until ending: {remaining}

Previous scenes:
{scenes_summary}

Characters:
{character_info}

Selected story path: {choice_title} - {choice_description}
Choice type: {choice_kind}
Preview: {preview}

Generate the next scene following this story path.

IMPORTANT:
- If only {remaining} scenes remain, start moving toward conclusion
- If this is the second-to-last scene, set up for the finale
- If this is the last scene, provide a satisfying ending

Keep it consistent with the characters and previous events.
Age group: {age_group}
Genre: {genre}

Return JSON with this structure:
{{
    "scene_number": {scene_number},
    "title": "Scene Title",
    "text": "Scene narrative text (2-3 paragraphs, age-appropriate)",
    "image_prompt": "Detailed visual description for image generation including: {art_style} style, characters present, setting, mood, and action",
    "characters_present": ["Names of characters in this scene"]
}}

Output ONLY valid JSON."#,
        title = story.title,
        total = story.num_scenes,
        choice_title = choice.title,
        choice_description = choice.description,
        choice_kind = choice.kind,
        age_group = story.age_group,
        genre = story.genre,
        art_style = story.art_style,
    )
}

/// Prompt for illustrating a scene, embedding the effective description
/// of every character present.
pub(crate) fn scene_image(story: &Story, scene: &Scene) -> String {
    let characters_descriptions = scene
        .characters_present
        .iter()
        .filter_map(|name| story.character(name))
        .map(|c| format!("{}: {}", c.name, c.effective_description()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Art Style: {art_style}

Scene Description: {image_prompt}

Characters in Scene:
{characters_descriptions}

IMPORTANT REQUIREMENTS:
1. Maintain EXACT character appearances as described
2. Keep the art style consistent as {art_style}
3. Age-appropriate for {age_group} year olds
4. Bright, engaging colors
5. Clear character expressions and actions
6. No text or words in the image"#,
        art_style = story.art_style,
        image_prompt = scene.image_prompt,
        age_group = story.age_group,
    )
}

/// Prompt for rewriting a character's visual description from a
/// reference image.
pub(crate) fn refine_character(name: &str, visual_description: &str) -> String {
    format!(
        r#"Analyze this character and remember their exact appearance:
Character: {name}
Description: {visual_description}

Extract and remember:
- Exact facial features
- Hair color and style
- Clothing details
- Distinctive marks
- Body proportions

Respond with a single detailed visual description that will be used to
maintain consistency across all scenes."#
    )
}
