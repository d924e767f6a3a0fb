use strum_macros::{Display, EnumString};

/// The type of a key image attached to a catalog element.
#[derive(Display, EnumString, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ImageType {
    OfferImageWide,
    DieselStoreFrontWide,
    OfferImageTall,
    Thumbnail,
    DieselStoreFrontTall,
}

impl ImageType {
    /// Image types in the order they are preferred for notifications. Wide images render best
    /// as Telegram photos.
    pub const PRIORITY: [ImageType; 5] = [
        ImageType::OfferImageWide,
        ImageType::DieselStoreFrontWide,
        ImageType::OfferImageTall,
        ImageType::Thumbnail,
        ImageType::DieselStoreFrontTall,
    ];
}
