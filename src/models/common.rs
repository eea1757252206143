use serde::{Deserialize, Serialize};

/// The four visual presets offered by the atelier. Each contributes a fixed
/// English prompt suffix appended after the motif.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Crystal,
    Cinematic,
    Snowglobe,
    Papercraft,
}

impl Style {
    pub const ALL: [Style; 4] = [
        Style::Crystal,
        Style::Cinematic,
        Style::Snowglobe,
        Style::Papercraft,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Style::Crystal => "crystal",
            Style::Cinematic => "cinematic",
            Style::Snowglobe => "snowglobe",
            Style::Papercraft => "papercraft",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Style::Crystal => "クリスタルガラス",
            Style::Cinematic => "シネマティック 3D アニメーション",
            Style::Snowglobe => "ガラススノードーム",
            Style::Papercraft => "ペーパークラフト",
        }
    }

    pub fn prompt_suffix(&self) -> &'static str {
        match self {
            Style::Crystal => {
                "delicate transparent glass ornament, crystal clear, intricate details, elegant, Christmas decoration"
            }
            Style::Cinematic => {
                "Pixar-style 3D rendered ornament, cinematic lighting, vibrant colors, smooth surfaces, Christmas decoration"
            }
            Style::Snowglobe => {
                "glass snow globe ornament, snowflakes inside, Christmas scene, vintage style, elegant"
            }
            Style::Papercraft => {
                "white papercraft ornament, intricate layered paper design, origami style, minimalist white only, monochrome white, no colors, pure white paper, Christmas decoration"
            }
        }
    }

    pub fn from_id(id: &str) -> Option<Style> {
        Style::ALL.iter().copied().find(|style| style.id() == id)
    }
}

/// Output size presets offered by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    Square,
    Vertical,
    Horizontal,
}

impl SizePreset {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            SizePreset::Square => (1024, 1024),
            SizePreset::Vertical => (576, 1024),
            SizePreset::Horizontal => (1024, 576),
        }
    }

    pub fn from_id(id: &str) -> Option<SizePreset> {
        match id {
            "square" => Some(SizePreset::Square),
            "vertical" => Some(SizePreset::Vertical),
            "horizontal" => Some(SizePreset::Horizontal),
            _ => None,
        }
    }
}

/// One upstream text-to-image endpoint, tried in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEndpoint {
    pub url: String,
    pub max_width: u32,
    pub max_height: u32,
}

impl ModelEndpoint {
    pub fn new(url: impl Into<String>, max_width: u32, max_height: u32) -> Self {
        Self {
            url: url.into(),
            max_width,
            max_height,
        }
    }

    /// Hosted inference endpoints in fallback priority order.
    pub fn defaults() -> Vec<ModelEndpoint> {
        const URLS: [&str; 5] = [
            "https://api-inference.huggingface.co/models/stabilityai/sdxl-turbo",
            "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0",
            "https://api-inference.huggingface.co/models/runwayml/stable-diffusion-v1-5",
            "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-2-1-base",
            "https://api-inference.huggingface.co/models/CompVis/stable-diffusion-v1-4",
        ];

        URLS.iter()
            .map(|url| ModelEndpoint::new(*url, 768, 768))
            .collect()
    }

    pub fn clamp(&self, width: u32, height: u32) -> (u32, u32) {
        (width.min(self.max_width), height.min(self.max_height))
    }
}

/// Motif pool for random (おまかせ) generation.
pub const RANDOM_MOTIFS: [&str; 10] = [
    "クリスマスツリー",
    "星",
    "雪の結晶",
    "ベル",
    "リース",
    "サンタクロース",
    "トナカイ",
    "プレゼント",
    "キャンドル",
    "オーナメントボール",
];

/// Maps the Japanese motif names to the English phrasing the upstream
/// models expect. Unknown motifs pass through unchanged.
pub fn translate_motif(motif: &str) -> &str {
    match motif {
        "クリスマスツリー" => "Christmas tree",
        "星" => "star",
        "雪の結晶" => "snowflake",
        "ベル" => "bell",
        "リース" => "wreath",
        "サンタクロース" => "Santa Claus",
        "トナカイ" => "reindeer",
        "プレゼント" => "present",
        "キャンドル" => "candle",
        "オーナメントボール" => "ornament ball",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_ids_round_trip() {
        for style in Style::ALL {
            assert_eq!(Style::from_id(style.id()), Some(style));
        }
        assert_eq!(Style::from_id("sepia"), None);
    }

    #[test]
    fn endpoint_clamp_caps_dimensions() {
        let endpoint = ModelEndpoint::new("https://example.test/model", 768, 768);
        assert_eq!(endpoint.clamp(1024, 576), (768, 576));
        assert_eq!(endpoint.clamp(512, 512), (512, 512));
    }

    #[test]
    fn default_endpoints_keep_priority_order() {
        let endpoints = ModelEndpoint::defaults();
        assert_eq!(endpoints.len(), 5);
        assert!(endpoints[0].url.contains("sdxl-turbo"));
        assert!(endpoints[4].url.contains("stable-diffusion-v1-4"));
    }

    #[test]
    fn motif_translation_falls_through() {
        assert_eq!(translate_motif("星"), "star");
        assert_eq!(translate_motif("snow fox"), "snow fox");
    }
}
