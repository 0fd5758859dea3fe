//! Builds the instructions sent to the image model.
//!
//! Both builders are pure: the same fields always yield the same string. Each
//! optional field contributes one whole clause or nothing.

/// Prompt for a generation with no reference image.
pub fn synthesize_unconditioned_prompt(
    prompt: &str,
    artistic_movement: Option<&str>,
    color_mood: Option<&str>,
) -> String {
    let mut text = format!(
        "Generate a high-resolution, visually stunning piece of abstract art. The core concept is: \"{}\". \
The artwork should be a complex and emotionally resonant masterpiece, suitable for a modern art gallery. \
Avoid literal interpretations; focus on abstract forms, textures, and the interplay of light and shadow.",
        prompt
    );

    if let Some(movement) = clause_value(artistic_movement) {
        text.push_str(&format!(
            " The piece should strongly embody the style of {}.",
            movement
        ));
    }
    if let Some(mood) = clause_value(color_mood) {
        text.push_str(&format!(
            " The color palette must evoke a {} mood, using a sophisticated and harmonious range of colors.",
            mood
        ));
    }

    text
}

/// Prompt accompanying a reference image.
pub fn synthesize_style_guided_prompt(
    prompt: &str,
    artistic_movement: Option<&str>,
    color_mood: Option<&str>,
    style_strength: Option<f64>,
) -> String {
    let mut text = format!(
        "As a master AI artist, create a new abstract artwork based on the core concept: \"{}\".\n",
        prompt
    );

    if let Some(movement) = clause_value(artistic_movement) {
        text.push_str(&format!(
            "Incorporate stylistic elements from the {} movement.\n",
            movement
        ));
    }
    if let Some(mood) = clause_value(color_mood) {
        text.push_str(&format!(
            "The overall color palette should evoke a {} mood.\n",
            mood
        ));
    }

    let influence = match style_strength {
        Some(strength) => format!("with an influence level of {}/100", strength),
        None => "with a subtle influence".to_string(),
    };
    text.push_str(&format!(
        "Deeply analyze the provided reference image and emulate its visual style, color palette, and textures. \
The fusion should be seamless, with the style applied {} to the core concept.",
        influence
    ));

    text
}

fn clause_value(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
