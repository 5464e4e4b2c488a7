use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PageSize {
    Letter,
    A4,
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// (width, height) in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
            PageSize::Custom { width, height } => (width, height),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AspectRatio {
    Fixed { width: f32, height: f32 },
    /// Taken from the decoded pixel size of the screenshot.
    Native,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldNameStyle {
    /// First character upper-cased, the rest lower-cased ("published At" → "Published at").
    Capitalize,
    AsIs,
}

impl FieldNameStyle {
    pub fn apply(self, name: &str) -> String {
        match self {
            FieldNameStyle::AsIs => name.to_string(),
            FieldNameStyle::Capitalize => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                    None => String::new(),
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FontChoice {
    /// Helvetica / Helvetica-Bold, not embedded.
    Builtin,
    /// System TrueType/OpenType family, subsetted and embedded.
    Family(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionTitles {
    pub channel: String,
    pub video: String,
    pub comments: String,
}

impl Default for SectionTitles {
    fn default() -> Self {
        Self {
            channel: "YouTube Channel Information".into(),
            video: "Video Information".into(),
            comments: "Comments".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    pub page_size: PageSize,
    pub margin: f32,
    pub font_size: f32,
    pub leading: f32,
    pub title_font_size: f32,
    /// Vertical space consumed by a section title line.
    pub title_advance: f32,
    pub field_gap: f32,
    pub record_gap: f32,
    pub section_gap: f32,
    pub image_width: f32,
    pub image_aspect: AspectRatio,
    pub image_spacing: f32,
    pub split_long_words: bool,
    pub field_names: FieldNameStyle,
    pub font: FontChoice,
    pub titles: SectionTitles,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margin: 72.0,
            font_size: 12.0,
            leading: 14.0,
            title_font_size: 16.0,
            title_advance: 28.0,
            field_gap: 10.0,
            record_gap: 20.0,
            section_gap: 20.0,
            image_width: 480.0,
            image_aspect: AspectRatio::Fixed {
                width: 480.0,
                height: 270.0,
            },
            image_spacing: 20.0,
            split_long_words: true,
            field_names: FieldNameStyle::Capitalize,
            font: FontChoice::Builtin,
            titles: SectionTitles::default(),
        }
    }
}

impl LayoutConfig {
    pub fn page_width(&self) -> f32 {
        self.page_size.dimensions().0
    }

    pub fn page_height(&self) -> f32 {
        self.page_size.dimensions().1
    }

    pub fn printable_width(&self) -> f32 {
        self.page_width() - 2.0 * self.margin
    }

    pub fn printable_height(&self) -> f32 {
        self.page_height() - 2.0 * self.margin
    }

    /// Every size must be finite; sizes positive, spacing non-negative.
    pub fn validate(&self) -> Result<(), Error> {
        let positive = |x: f32| x.is_finite() && x > 0.0;
        let non_negative = |x: f32| x.is_finite() && x >= 0.0;

        let (w, h) = self.page_size.dimensions();
        if !(positive(w) && positive(h)) {
            return Err(Error::InvalidInput(format!("page size {w}x{h} is not positive")));
        }
        if !non_negative(self.margin)
            || !positive(self.printable_width())
            || !positive(self.printable_height())
        {
            return Err(Error::InvalidInput(format!(
                "margin {} leaves no printable area on a {w}x{h} page",
                self.margin
            )));
        }
        if !(positive(self.font_size) && positive(self.title_font_size) && positive(self.leading)) {
            return Err(Error::InvalidInput("font sizes and leading must be positive".into()));
        }
        if !positive(self.image_width) {
            return Err(Error::InvalidInput(format!(
                "image width {} is not positive",
                self.image_width
            )));
        }
        if let AspectRatio::Fixed { width, height } = self.image_aspect
            && !(positive(width) && positive(height))
        {
            return Err(Error::InvalidInput(format!(
                "image aspect {width}:{height} is not positive"
            )));
        }
        let gaps = [
            self.title_advance,
            self.field_gap,
            self.record_gap,
            self.section_gap,
            self.image_spacing,
        ];
        if !gaps.into_iter().all(non_negative) {
            return Err(Error::InvalidInput("spacing values must not be negative".into()));
        }
        Ok(())
    }
}
