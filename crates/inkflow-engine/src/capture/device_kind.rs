/// Ink device families, as far as rendering cares.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum DeviceKind {
    #[default]
    Unknown,
    ApplePencil,
    BambooFineline,
    BambooFineline2,
    BambooFineline3,
    BambooPro,
    BambooSlateOrFolio,
    BambooSpark,
    BambooSketch,
    ClipboardPhu111,
    CreativeStylus,
    CreativeStylus2,
    IntuosPaper,
    MontblancAugmentedPaper,
    MontblancAugmentedPaperPlus,
}

impl DeviceKind {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::ApplePencil => "Apple Pencil",
            Self::BambooFineline => "Bamboo Fineline",
            Self::BambooFineline2 => "Bamboo Fineline 2",
            Self::BambooFineline3 => "Bamboo Fineline 3",
            Self::BambooPro => "Bamboo Pro",
            Self::BambooSlateOrFolio => "Bamboo Slate or Folio",
            Self::BambooSpark => "Bamboo Spark",
            Self::BambooSketch => "Bamboo Sketch",
            Self::ClipboardPhu111 => "Wacom Clipboard PHU-111",
            Self::CreativeStylus => "Creative Stylus",
            Self::CreativeStylus2 => "Creative Stylus 2",
            Self::IntuosPaper => "Intuos Pro Paper",
            Self::MontblancAugmentedPaper => "Montblanc Augmented Paper",
            Self::MontblancAugmentedPaperPlus => "Montblanc Augmented Paper Plus",
        }
    }

    /// Smart pads report positions on their own sensor; styluses draw on
    /// the screen and need no device transform.
    pub fn is_smartpad(self) -> bool {
        !matches!(
            self,
            Self::ApplePencil
                | Self::BambooFineline
                | Self::BambooFineline2
                | Self::BambooFineline3
                | Self::CreativeStylus
                | Self::CreativeStylus2
                | Self::BambooSketch
        )
    }

    /// Sensor mounted at 90° to portrait.
    pub fn sensor_rotated(self) -> bool {
        matches!(self, Self::BambooPro | Self::BambooSlateOrFolio)
    }

    /// Transform for realtime ink from this device into a view.
    pub fn view_transform(self, sensor: (f32, f32), view: (f32, f32)) -> super::DeviceTransform {
        if self.is_smartpad() {
            super::DeviceTransform::fit(sensor, view, self.sensor_rotated())
        } else {
            super::DeviceTransform::IDENTITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::DeviceTransform;

    #[test]
    fn styluses_are_not_smartpads() {
        assert!(!DeviceKind::ApplePencil.is_smartpad());
        assert!(DeviceKind::BambooSpark.is_smartpad());
        assert!(DeviceKind::Unknown.is_smartpad());
    }

    #[test]
    fn stylus_transform_is_identity() {
        let t = DeviceKind::BambooSketch.view_transform((100.0, 100.0), (300.0, 300.0));
        assert_eq!(t, DeviceTransform::IDENTITY);
    }

    #[test]
    fn rotated_pads_get_rotated_fit() {
        let t = DeviceKind::BambooSlateOrFolio.view_transform((100.0, 50.0), (50.0, 100.0));
        assert_eq!(t, DeviceTransform::fit((100.0, 50.0), (50.0, 100.0), true));
        assert!(DeviceKind::BambooPro.sensor_rotated());
        assert!(!DeviceKind::IntuosPaper.sensor_rotated());
    }
}
