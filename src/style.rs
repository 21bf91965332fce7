use std::collections::HashMap;

use crate::models::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<&str> for Color {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        if hex.len() != 6 {
            return Err(anyhow::anyhow!("Invalid color value: {}", value));
        }
        let packed = u32::from_str_radix(hex, 16)
            .map_err(|e| anyhow::anyhow!("Invalid color value {}: {}", value, e))?;
        Ok(Color::from(packed))
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        let r = ((value >> 16) & 0xFF) as u8;
        let g = ((value >> 8) & 0xFF) as u8;
        let b = (value & 0xFF) as u8;
        Color { r, g, b }
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        ((color.r as u32) << 16) | ((color.g as u32) << 8) | (color.b as u32)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStyle {
    pub color: Color,
    pub title: String,
}

/// Display color and title per category. Built once and handed to whoever
/// renders markers.
#[derive(Debug, Clone)]
pub struct CategoryStyles {
    styles: HashMap<Category, CategoryStyle>,
}

impl CategoryStyles {
    pub fn new(styles: HashMap<Category, CategoryStyle>) -> Self {
        Self { styles }
    }

    pub fn from_hex<'a>(entries: impl IntoIterator<Item = (Category, &'a str, &'a str)>) -> anyhow::Result<Self> {
        let mut styles = HashMap::new();
        for (category, hex, title) in entries {
            styles.insert(
                category,
                CategoryStyle {
                    color: Color::try_from(hex)?,
                    title: title.to_string(),
                },
            );
        }
        Ok(Self { styles })
    }

    pub fn get(&self, category: Category) -> Option<&CategoryStyle> {
        self.styles.get(&category)
    }
}

impl Default for CategoryStyles {
    fn default() -> Self {
        let style = |packed: u32, title: &str| CategoryStyle {
            color: Color::from(packed),
            title: title.to_string(),
        };
        Self::new(HashMap::from([
            (Category::Tourism, style(0x64B5F6, "Tourism")),
            (Category::Museums, style(0xBA68C8, "Museums")),
            (Category::Art, style(0xE57373, "Art")),
            (Category::Food, style(0x81C784, "Food")),
            (Category::Special, style(0xFFD54F, "Specials")),
        ]))
    }
}
