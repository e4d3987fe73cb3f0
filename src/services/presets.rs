use std::collections::HashMap;
use std::sync::OnceLock;

/// Camera presets understood by `/api/v1/camera-edit`. Fragments are
/// bilingual because the downstream editing model was trained on both.
const CAMERA_PRESETS: &[(&str, &str)] = &[
    ("Front View", "正面视角, front view, facing camera directly"),
    ("Profile Left", "左侧轮廓, left profile view, 90 degree side angle"),
    ("Profile Right", "右侧轮廓, right profile view, 90 degree side angle"),
    ("Back View", "背面视角, back view, rear angle"),
    ("Three-Quarter Left", "左侧四分之三视角, left three-quarter view"),
    ("Three-Quarter Right", "右侧四分之三视角, right three-quarter view"),
    ("Top Down View", "俯视图, top-down view, bird's eye perspective"),
    ("Low Angle", "仰角视图, low angle shot looking up"),
    ("Eye Level", "平视, eye level view, neutral height"),
    ("High Angle", "俯角, high angle looking down"),
    ("Dolly In", "向前推进, camera dollies forward, push in"),
    ("Dolly Out", "向后拉出, camera dollies backward, pull out"),
    ("Crane Up", "摇臂上升, crane shot moving upward"),
    ("Crane Down", "摇臂下降, crane shot moving downward"),
    ("Orbit Left", "向左环绕, orbit rotating left around subject"),
    ("Orbit Right", "向右环绕, orbit rotating right around subject"),
    ("Pan Left", "向左平移, camera pans to the left"),
    ("Pan Right", "向右平移, camera pans to the right"),
    ("FPV Drone", "第一人称无人机, FPV drone shot, dynamic motion"),
    ("Crash Zoom In", "快速推进, rapid zoom in, dramatic focus"),
    ("Wide Angle", "广角镜头, wide angle lens, expansive view"),
    ("Close Up", "特写镜头, close-up shot, tight framing"),
    ("Dutch Angle", "荷兰角度, tilted angle, canted frame"),
];

const LIGHTING_PRESETS: &[(&str, &str)] = &[
    ("None", ""),
    ("Cinematic", "cinematic lighting, dramatic shadows"),
    ("Soft Natural", "soft natural lighting, diffused"),
    ("Studio", "studio lighting setup, professional"),
    ("Sunset", "warm sunset lighting, golden hour"),
    ("Neon", "neon lighting, vibrant colors"),
    ("Volumetric", "volumetric lighting, atmospheric rays"),
];

fn camera_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| CAMERA_PRESETS.iter().copied().collect())
}

fn lighting_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| LIGHTING_PRESETS.iter().copied().collect())
}

/// Resolve a camera preset name to its instruction fragment.
///
/// An unknown name is returned verbatim: callers may pass free-form
/// camera directions instead of a preset.
pub fn resolve_camera(name: &str) -> String {
    camera_table()
        .get(name)
        .map(|s| s.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Resolve a lighting preset name to its instruction fragment.
///
/// Unlike camera presets, an unknown name resolves to the empty string
/// and the fragment is simply omitted from the prompt.
pub fn resolve_lighting(name: &str) -> String {
    lighting_table()
        .get(name)
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Build the final prompt: camera fragment first, then lighting, then any
/// free-text addendum, comma-joined. Empty fragments are skipped; the
/// ordering is part of the response contract.
pub fn assemble_prompt(camera: &str, lighting: &str, additional: &str) -> String {
    let mut prompt = camera.to_string();
    if !lighting.is_empty() {
        prompt.push_str(", ");
        prompt.push_str(lighting);
    }
    if !additional.is_empty() {
        prompt.push_str(", ");
        prompt.push_str(additional);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_camera_preset_resolves() {
        assert_eq!(
            resolve_camera("Front View"),
            "正面视角, front view, facing camera directly"
        );
    }

    #[test]
    fn unknown_camera_preset_passes_through() {
        assert_eq!(resolve_camera("My Custom Shot"), "My Custom Shot");
    }

    #[test]
    fn known_lighting_preset_resolves() {
        assert_eq!(
            resolve_lighting("Cinematic"),
            "cinematic lighting, dramatic shadows"
        );
    }

    #[test]
    fn unknown_lighting_preset_resolves_to_empty() {
        assert_eq!(resolve_lighting("Candlelight"), "");
    }

    #[test]
    fn lighting_none_is_empty() {
        assert_eq!(resolve_lighting("None"), "");
    }

    #[test]
    fn assembly_order_is_stable() {
        assert_eq!(assemble_prompt("A", "B", "C"), "A, B, C");
        assert_eq!(assemble_prompt("A", "", "C"), "A, C");
        assert_eq!(assemble_prompt("A", "", ""), "A");
        assert_eq!(assemble_prompt("A", "B", ""), "A, B");
    }

    #[test]
    fn embedded_commas_are_not_escaped() {
        assert_eq!(assemble_prompt("a, b", "c, d", ""), "a, b, c, d");
    }

    #[test]
    fn front_view_cinematic_scenario() {
        let prompt = assemble_prompt(
            &resolve_camera("Front View"),
            &resolve_lighting("Cinematic"),
            "",
        );
        assert_eq!(
            prompt,
            "正面视角, front view, facing camera directly, cinematic lighting, dramatic shadows"
        );
    }

    #[test]
    fn custom_camera_with_no_lighting_scenario() {
        let prompt = assemble_prompt(
            &resolve_camera("My Custom Shot"),
            &resolve_lighting("None"),
            "",
        );
        assert_eq!(prompt, "My Custom Shot");
    }
}
