//! Prompt builders, one per creative preset. Each maps a selected style key
//! to its natural-language template, appends the user's optional free-text
//! fields, and returns the assembled prompt. The only validation is
//! "required field non-empty"; dispatching is the caller's job.

use crate::{ImagenError, Result};

fn require<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ImagenError::InvalidRequest(format!(
            "{field} must be non-empty"
        )));
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStyle {
    Minimalist,
    Luxury,
    Lifestyle,
    Studio,
}

impl ProductStyle {
    fn template(self) -> &'static str {
        match self {
            Self::Minimalist => {
                "Create a minimalist professional product photography with clean white background, perfect lighting, sharp focus, commercial quality, e-commerce ready, studio-quality details, and modern minimalist aesthetics."
            }
            Self::Luxury => {
                "Create a luxury premium product photography with elegant styling, sophisticated lighting, high-end presentation, rich textures, luxury brand quality, dramatic shadows, and premium commercial appeal."
            }
            Self::Lifestyle => {
                "Create a lifestyle product photography with natural setting, authentic context, real-world usage scenario, natural lighting, relatable environment, lifestyle brand aesthetics, and approachable commercial appeal."
            }
            Self::Studio => {
                "Create a professional studio product photography with controlled lighting setup, gradient background, commercial grade quality, catalog-ready presentation, perfect color accuracy, and advertising-standard excellence."
            }
        }
    }
}

/// Commercial product shots for online stores.
#[derive(Debug, Clone)]
pub struct ProductPhoto {
    pub style: ProductStyle,
    pub background: String,
    pub details: String,
}

impl ProductPhoto {
    pub fn new(style: ProductStyle) -> Self {
        Self {
            style,
            background: String::new(),
            details: String::new(),
        }
    }

    pub fn build(&self) -> Result<String> {
        let mut prompt = self.style.template().to_string();
        if !self.background.trim().is_empty() {
            prompt.push_str(&format!(" Background: {}.", self.background.trim()));
        }
        if !self.details.trim().is_empty() {
            prompt.push_str(&format!(" Product details: {}.", self.details.trim()));
        }
        prompt.push_str(
            " Ensure the product is the main focus with perfect clarity and commercial presentation quality.",
        );
        Ok(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Promo,
    ProductLaunch,
    Event,
    Social,
}

/// Marketing banners. The subject (product, offer, event or content name) is
/// required; it is woven into the template itself.
#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub subject: String,
    pub colors: String,
    pub tagline: String,
}

impl Banner {
    pub fn new(kind: BannerKind, subject: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            colors: String::new(),
            tagline: String::new(),
        }
    }

    pub fn build(&self) -> Result<String> {
        let subject = require(&self.subject, "banner subject")?;
        let mut prompt = match self.kind {
            BannerKind::Promo => format!(
                "Create an eye-catching promotional banner with bold discount offers, vibrant attractive colors, clear call-to-action, modern design layout, and marketing effectiveness. Product/offer: {subject}"
            ),
            BannerKind::ProductLaunch => format!(
                "Create a professional product launch banner with premium product showcase, elegant minimalist design, brand-focused composition, high-quality visuals, and commercial appeal. Product: {subject}"
            ),
            BannerKind::Event => format!(
                "Create an exciting event banner with event information hierarchy, engaging visual elements, date/time prominence, dynamic composition, and event marketing effectiveness. Event: {subject}"
            ),
            BannerKind::Social => format!(
                "Create a social media banner optimized for engagement with trendy modern design, social-friendly dimensions, shareable visual appeal, platform-appropriate styling. Content: {subject}"
            ),
        };
        if !self.colors.trim().is_empty() {
            prompt.push_str(&format!(" Use color scheme: {}.", self.colors.trim()));
        }
        if !self.tagline.trim().is_empty() {
            prompt.push_str(&format!(" Include tagline: \"{}\".", self.tagline.trim()));
        }
        prompt.push_str(
            " Design should be professional, modern, and attention-grabbing with clear typography and balanced composition.",
        );
        Ok(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselStyle {
    Modern,
    Colorful,
    Elegant,
    Fun,
}

impl CarouselStyle {
    fn template(self) -> &'static str {
        match self {
            Self::Modern => {
                "Create a modern minimalist Instagram carousel design with clean lines, professional typography, white space balance, contemporary color palette, and sleek visual hierarchy suitable for 5 slides."
            }
            Self::Colorful => {
                "Create a vibrant colorful Instagram carousel design with bold bright colors, eye-catching gradients, dynamic layouts, energetic composition, and engaging visual appeal for 5 slides."
            }
            Self::Elegant => {
                "Create an elegant luxury Instagram carousel design with sophisticated styling, premium color scheme, refined typography, high-end aesthetics, and polished visual presentation for 5 slides."
            }
            Self::Fun => {
                "Create a fun playful Instagram carousel design with casual friendly tone, approachable styling, creative layouts, entertaining visuals, and engaging casual aesthetics for 5 slides."
            }
        }
    }
}

/// Instagram carousel sets.
#[derive(Debug, Clone)]
pub struct Carousel {
    pub style: CarouselStyle,
    pub topic: String,
}

impl Carousel {
    pub fn new(style: CarouselStyle) -> Self {
        Self {
            style,
            topic: String::new(),
        }
    }

    pub fn build(&self) -> Result<String> {
        let mut prompt = self.style.template().to_string();
        if !self.topic.trim().is_empty() {
            prompt.push_str(&format!(" Topic/content: {}.", self.topic.trim()));
        }
        prompt.push_str(
            " Each slide should be cohesive, Instagram-optimized (1080x1350), and designed for maximum engagement and swipeability.",
        );
        Ok(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationTheme {
    Elegant,
    Modern,
    Romantic,
    Traditional,
}

impl InvitationTheme {
    fn template(self) -> &'static str {
        match self {
            Self::Elegant => {
                "Create an elegant luxury wedding invitation design with sophisticated gold accents, classic ornamental patterns, premium typography, refined color palette, formal composition, and timeless wedding elegance."
            }
            Self::Modern => {
                "Create a modern minimalist wedding invitation design with clean contemporary layout, simple elegant typography, subtle color scheme, geometric elements, uncluttered composition, and modern sophistication."
            }
            Self::Romantic => {
                "Create a romantic dreamy wedding invitation design with soft pastel colors, floral decorative elements, delicate typography, watercolor effects, gentle romantic atmosphere, and fairytale wedding aesthetics."
            }
            Self::Traditional => {
                "Create a traditional cultural wedding invitation design with authentic ethnic patterns, cultural motifs, heritage-inspired ornaments, traditional color schemes, and respectful cultural representation."
            }
        }
    }
}

/// Wedding invitations. Both names are required.
#[derive(Debug, Clone)]
pub struct WeddingInvitation {
    pub theme: InvitationTheme,
    pub bride: String,
    pub groom: String,
    pub date: String,
    /// Whether the couple attached photos to work into the design.
    pub include_photos: bool,
}

impl WeddingInvitation {
    pub fn new(theme: InvitationTheme, bride: impl Into<String>, groom: impl Into<String>) -> Self {
        Self {
            theme,
            bride: bride.into(),
            groom: groom.into(),
            date: String::new(),
            include_photos: false,
        }
    }

    pub fn build(&self) -> Result<String> {
        let bride = require(&self.bride, "bride name")?;
        let groom = require(&self.groom, "groom name")?;

        let mut prompt = self.theme.template().to_string();
        prompt.push_str(&format!(" Names: {bride} & {groom}."));
        if !self.date.trim().is_empty() {
            prompt.push_str(&format!(" Date: {}.", self.date.trim()));
        }
        if self.include_photos {
            prompt.push_str(" Include the uploaded photo(s) in the design.");
        }
        prompt.push_str(
            " Design should be beautiful, professional, print-ready, and perfect for digital sharing.",
        );
        Ok(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreWeddingStyle {
    Cinematic,
    Romantic,
    Vintage,
    Modern,
}

impl PreWeddingStyle {
    fn template(self) -> &'static str {
        match self {
            Self::Cinematic => {
                "Create a cinematic pre-wedding photo with dramatic lighting, professional composition, emotional depth, film-like quality, beautiful bokeh effect, and romantic atmosphere. Style: movie poster aesthetic."
            }
            Self::Romantic => {
                "Create a romantic pre-wedding photo with soft pastel colors, dreamy atmosphere, gentle lighting, tender moments, beautiful background blur, and fairytale-like ambiance."
            }
            Self::Vintage => {
                "Create a vintage pre-wedding photo with classic film grain, timeless composition, warm sepia tones, nostalgic feeling, elegant poses, and retro photography aesthetics."
            }
            Self::Modern => {
                "Create a modern minimalist pre-wedding photo with clean lines, elegant simplicity, contemporary styling, natural lighting, sophisticated composition, and high-end fashion photography feel."
            }
        }
    }
}

/// Pre-wedding shoots from uploaded couple photos.
#[derive(Debug, Clone)]
pub struct PreWedding {
    pub style: PreWeddingStyle,
    pub custom: String,
}

impl PreWedding {
    pub fn new(style: PreWeddingStyle) -> Self {
        Self {
            style,
            custom: String::new(),
        }
    }

    pub fn build(&self) -> Result<String> {
        let template = self.style.template();
        if self.custom.trim().is_empty() {
            return Ok(template.to_string());
        }
        Ok(format!(
            "{template} Additional requirements: {}",
            self.custom.trim()
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoEditMode {
    Restore,
    FormalPortrait,
}

/// Photo restoration and formal-portrait conversion; fixed prompts.
#[derive(Debug, Clone)]
pub struct PhotoEdit {
    pub mode: PhotoEditMode,
}

impl PhotoEdit {
    pub fn new(mode: PhotoEditMode) -> Self {
        Self { mode }
    }

    pub fn build(&self) -> Result<String> {
        let prompt = match self.mode {
            PhotoEditMode::Restore => {
                "Restore this old or damaged photo to its best quality. Remove scratches, fix colors, enhance details, improve clarity and sharpness. Make it look professionally restored while maintaining the original character and authenticity of the photo."
            }
            PhotoEditMode::FormalPortrait => {
                "Transform this photo into a professional formal portrait suitable for official documents (ID card, passport, resume). Ensure: proper formal composition, clean white/blue background, good lighting, professional appearance, sharp focus, appropriate facial expression, and meet standard photo requirements."
            }
        };
        Ok(prompt.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPhotoKind {
    Fashion,
    Commercial,
    Editorial,
    Lifestyle,
}

impl ModelPhotoKind {
    fn template(self) -> &'static str {
        match self {
            Self::Fashion => {
                "Create a high-end fashion model photo with professional lighting, runway-worthy styling, elegant pose, sophisticated composition, magazine-quality appearance, perfect styling, and luxury fashion photography aesthetics."
            }
            Self::Commercial => {
                "Create a commercial model photo suitable for advertising with professional appearance, engaging expression, clean composition, product-friendly background, marketable look, and commercial photography standards."
            }
            Self::Editorial => {
                "Create an editorial model photo for magazine publication with artistic composition, strong visual storytelling, fashion-forward styling, creative lighting, unique perspective, and editorial photography excellence."
            }
            Self::Lifestyle => {
                "Create a lifestyle model photo with natural candid feel, relaxed authentic moments, casual elegant style, outdoor/indoor natural settings, approachable beauty, and lifestyle photography warmth."
            }
        }
    }
}

/// Model photography from an uploaded portrait.
#[derive(Debug, Clone)]
pub struct ModelPhoto {
    pub kind: ModelPhotoKind,
    pub pose: String,
}

impl ModelPhoto {
    pub fn new(kind: ModelPhotoKind) -> Self {
        Self {
            kind,
            pose: String::new(),
        }
    }

    pub fn build(&self) -> Result<String> {
        let template = self.kind.template();
        if self.pose.trim().is_empty() {
            return Ok(template.to_string());
        }
        Ok(format!("{template} Pose/scene: {}", self.pose.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchColorStyle {
    Realistic,
    Vibrant,
    Artistic,
    Anime,
}

impl SketchColorStyle {
    fn template(self) -> &'static str {
        match self {
            Self::Realistic => {
                "Transform this black and white sketch into a realistic full-color photograph with natural lighting, photorealistic details, accurate colors, proper shading and highlights, lifelike textures, and professional photo quality."
            }
            Self::Vibrant => {
                "Transform this black and white sketch into a vibrant colorful image with bold bright colors, saturated hues, energetic color palette, dynamic contrast, eye-catching vibrancy, and artistic color enhancement."
            }
            Self::Artistic => {
                "Transform this black and white sketch into an artistic colored painting with painterly brushstrokes, artistic color harmony, expressive colors, fine art aesthetics, traditional painting style, and museum-quality artistry."
            }
            Self::Anime => {
                "Transform this black and white sketch into a colorful anime-style illustration with anime color palette, cel-shaded coloring, characteristic anime aesthetics, vibrant anime colors, and Japanese animation art style."
            }
        }
    }
}

/// Sketch colorization.
#[derive(Debug, Clone)]
pub struct SketchColoring {
    pub style: SketchColorStyle,
    pub description: String,
}

impl SketchColoring {
    pub fn new(style: SketchColorStyle) -> Self {
        Self {
            style,
            description: String::new(),
        }
    }

    pub fn build(&self) -> Result<String> {
        let mut prompt = self.style.template().to_string();
        if !self.description.trim().is_empty() {
            prompt.push_str(&format!(" Additional context: {}", self.description.trim()));
        }
        prompt.push_str(
            " Maintain the original composition and structure while adding appropriate colors naturally.",
        );
        Ok(prompt)
    }
}

/// Merge several uploads into one composition; single fixed prompt.
#[derive(Debug, Clone, Default)]
pub struct MergePhotos;

impl MergePhotos {
    pub fn build(&self) -> Result<String> {
        Ok(
            "Gabungkan gambar-gambar ini menjadi satu komposisi profesional dengan kualitas HD."
                .to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_requires_subject() {
        let err = Banner::new(BannerKind::Promo, "  ").build().expect_err("blank subject");
        match err {
            ImagenError::InvalidRequest(message) => assert!(message.contains("subject")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn banner_appends_optional_fields_in_order() {
        let mut banner = Banner::new(BannerKind::Promo, "Kopi Nusantara");
        banner.colors = "red and gold".to_string();
        banner.tagline = "Diskon 50%".to_string();

        let prompt = banner.build().unwrap();
        assert!(prompt.starts_with("Create an eye-catching promotional banner"));
        assert!(prompt.contains("Product/offer: Kopi Nusantara"));
        let colors_at = prompt.find("Use color scheme: red and gold.").unwrap();
        let tagline_at = prompt.find("Include tagline: \"Diskon 50%\".").unwrap();
        assert!(colors_at < tagline_at);
        assert!(prompt.ends_with("balanced composition."));
    }

    #[test]
    fn wedding_invitation_requires_both_names() {
        let err = WeddingInvitation::new(InvitationTheme::Elegant, "Sari", " ")
            .build()
            .expect_err("blank groom");
        match err {
            ImagenError::InvalidRequest(message) => assert!(message.contains("groom")),
            other => panic!("unexpected error: {other:?}"),
        }

        let mut invitation = WeddingInvitation::new(InvitationTheme::Romantic, "Sari", "Budi");
        invitation.date = "12 Desember 2026".to_string();
        invitation.include_photos = true;
        let prompt = invitation.build().unwrap();
        assert!(prompt.contains(" Names: Sari & Budi."));
        assert!(prompt.contains(" Date: 12 Desember 2026."));
        assert!(prompt.contains(" Include the uploaded photo(s) in the design."));
    }

    #[test]
    fn pre_wedding_appends_custom_requirements() {
        let plain = PreWedding::new(PreWeddingStyle::Vintage).build().unwrap();
        assert!(plain.ends_with("retro photography aesthetics."));

        let mut custom = PreWedding::new(PreWeddingStyle::Vintage);
        custom.custom = "at a beach during sunset".to_string();
        let prompt = custom.build().unwrap();
        assert!(prompt.ends_with("Additional requirements: at a beach during sunset"));
    }

    #[test]
    fn photo_edit_prompts_are_fixed() {
        let restore = PhotoEdit::new(PhotoEditMode::Restore).build().unwrap();
        assert!(restore.starts_with("Restore this old or damaged photo"));

        let formal = PhotoEdit::new(PhotoEditMode::FormalPortrait).build().unwrap();
        assert!(formal.contains("ID card, passport, resume"));
    }

    #[test]
    fn model_photo_appends_pose() {
        let mut model = ModelPhoto::new(ModelPhotoKind::Editorial);
        model.pose = "looking over shoulder".to_string();
        let prompt = model.build().unwrap();
        assert!(prompt.ends_with("Pose/scene: looking over shoulder"));
    }

    #[test]
    fn sketch_coloring_keeps_closing_sentence_last() {
        let mut sketch = SketchColoring::new(SketchColorStyle::Anime);
        sketch.description = "a mountain village".to_string();
        let prompt = sketch.build().unwrap();
        assert!(prompt.contains("Additional context: a mountain village"));
        assert!(prompt.ends_with("adding appropriate colors naturally."));
    }

    #[test]
    fn carousel_and_product_templates_close_consistently() {
        let carousel = Carousel::new(CarouselStyle::Fun).build().unwrap();
        assert!(carousel.ends_with("maximum engagement and swipeability."));

        let product = ProductPhoto::new(ProductStyle::Studio).build().unwrap();
        assert!(product.ends_with("commercial presentation quality."));
    }

    #[test]
    fn merge_prompt_is_fixed() {
        assert!(MergePhotos.build().unwrap().starts_with("Gabungkan"));
    }
}
