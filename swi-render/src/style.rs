use image::Rgba;
use swi_mesh::RiskLevel;

/// Colors used to paint risk cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub normal: [u8; 3],
    pub caution: [u8; 3],
    pub warning: [u8; 3],
    pub disaster: [u8; 3],
    /// Alpha applied to every fill color
    pub fill_alpha: u8,
    pub border: Rgba<u8>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            normal: [0x4C, 0xAF, 0x50],
            caution: [0xFF, 0xC1, 0x07],
            warning: [0xFF, 0x98, 0x00],
            disaster: [0xF4, 0x43, 0x36],
            // 0.7
            fill_alpha: 179,
            // rgba(200, 200, 200, 0.8)
            border: Rgba([200, 200, 200, 204]),
        }
    }
}

impl RenderStyle {
    /// Fill color for `level`.
    pub fn color_for(&self, level: RiskLevel) -> Rgba<u8> {
        let [r, g, b] = match level {
            RiskLevel::Normal => self.normal,
            RiskLevel::Caution => self.caution,
            RiskLevel::Warning => self.warning,
            RiskLevel::Disaster => self.disaster,
        };
        Rgba([r, g, b, self.fill_alpha])
    }
}
