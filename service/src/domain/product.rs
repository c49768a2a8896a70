//! [`Product`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

define_text! {
    #[doc = "ID of a [`Product`]."]
    Id(max = 128)
}

/// Catalog product, as mirrored from the commerce platform.
///
/// [`Product`]s are never written by this service, apart from their
/// [`Attributes`].
#[derive(Clone, Debug)]
pub struct Product {
    /// ID of this [`Product`].
    pub id: Id,

    /// [`Title`] of this [`Product`].
    pub title: Title,

    /// Description of this [`Product`].
    pub description: Option<String>,

    /// URL handle of this [`Product`].
    pub handle: Handle,

    /// Thumbnail URL of this [`Product`].
    pub thumbnail: Option<String>,

    /// Publication [`Status`] of this [`Product`].
    pub status: Status,
}

define_text! {
    #[doc = "Title of a [`Product`]."]
    Title(max = 512)
}

define_text! {
    #[doc = "URL handle of a [`Product`]."]
    Handle(max = 512)
}

define_kind! {
    #[doc = "Publication status of a [`Product`]."]
    enum Status {
        #[doc = "Not visible in the storefront yet."]
        Draft = "draft",

        #[doc = "Proposed for publication."]
        Proposed = "proposed",

        #[doc = "Visible in the storefront."]
        Published = "published",

        #[doc = "Rejected for publication."]
        Rejected = "rejected",
    }
}

/// Filterable attributes of a [`Product`], owned by this service.
#[derive(Clone, Debug)]
pub struct Attributes {
    /// ID of the described [`Product`].
    pub product_id: Id,

    /// Hardware [`Specification`] of the [`Product`].
    pub specification: Specification,

    /// [`DateTime`] when these [`Attributes`] were created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when these [`Attributes`] were updated last time.
    pub updated_at: ModificationDateTime,
}

/// Filterable hardware specification of a [`Product`].
///
/// Every value is optional, as not every product is a laptop.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Specification {
    /// Processor model, like `Intel Core i7-1365U`.
    pub processor_type: Option<Spec>,

    /// [`ProcessorFamily`] used for faceted search.
    pub processor_family: Option<ProcessorFamily>,

    /// Memory size in gigabytes.
    pub ram_size: Option<Gigabytes>,

    /// Storage capacity in gigabytes.
    pub storage_capacity: Option<Gigabytes>,

    /// [`StorageType`] of the drive.
    pub storage_type: Option<StorageType>,

    /// Screen diagonal in inches.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub screen_size: Option<Decimal>,

    /// Screen resolution, like `1920x1080`.
    pub screen_resolution: Option<Spec>,

    /// [`GraphicsType`] of the device.
    pub graphics_type: Option<GraphicsType>,

    /// Graphics card model, like `NVIDIA T1200`.
    pub graphics_card: Option<Spec>,

    /// [`Condition`] of the device.
    pub condition: Option<Condition>,

    /// Pre-installed operating system, like `Windows 11 Pro`.
    pub operating_system: Option<Spec>,
}

define_text! {
    #[doc = "Free-text hardware specification value."]
    Spec(max = 255)
}

/// Amount of gigabytes.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    derive_more::Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[serde(try_from = "i32")]
pub struct Gigabytes(i32);

impl Gigabytes {
    /// Creates new [`Gigabytes`] if the provided `amount` is positive.
    #[must_use]
    pub fn new(amount: i32) -> Option<Self> {
        (amount > 0).then_some(Self(amount))
    }

    /// Returns the amount of these [`Gigabytes`].
    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Gigabytes {
    type Error = &'static str;

    fn try_from(amount: i32) -> Result<Self, Self::Error> {
        Self::new(amount).ok_or("gigabytes must be positive")
    }
}

define_kind! {
    #[doc = "Processor family used for faceted search."]
    enum ProcessorFamily {
        #[doc = "Intel Core i5."]
        IntelCoreI5 = "intel-core-i5",

        #[doc = "Intel Core i7."]
        IntelCoreI7 = "intel-core-i7",

        #[doc = "Intel Core i9."]
        IntelCoreI9 = "intel-core-i9",

        #[doc = "Intel Core Ultra 7."]
        IntelCoreUltra7 = "intel-core-ultra-7",

        #[doc = "AMD Ryzen 5."]
        Ryzen5 = "ryzen-5",

        #[doc = "Any other processor."]
        Other = "other",
    }
}

define_kind! {
    #[doc = "Type of a storage drive."]
    enum StorageType {
        #[doc = "SATA solid state drive."]
        Ssd = "SSD",

        #[doc = "NVMe drive."]
        Nvme = "NVMe",

        #[doc = "M.2 NVMe drive."]
        M2Nvme = "M.2 NVMe",
    }
}

define_kind! {
    #[doc = "Type of graphics."]
    enum GraphicsType {
        #[doc = "Graphics integrated into the processor."]
        Integrated = "Geïntegreerd",

        #[doc = "Dedicated graphics card."]
        Dedicated = "Dedicated",
    }
}

define_kind! {
    #[doc = "Condition of a device."]
    enum Condition {
        #[doc = "Brand new device."]
        New = "Nieuw",

        #[doc = "Refurbished device."]
        Renewed = "Renewed",
    }
}

/// [`DateTime`] when [`Attributes`] were created.
pub type CreationDateTime = DateTimeOf<(Attributes, unit::Creation)>;

/// [`DateTime`] when [`Attributes`] were updated last time.
pub type ModificationDateTime = DateTimeOf<(Attributes, unit::Modification)>;

#[cfg(test)]
mod spec {
    use super::{GraphicsType, ProcessorFamily, Specification, StorageType};

    #[test]
    fn parses_attribute_kinds() {
        assert_eq!(
            "intel-core-ultra-7".parse::<ProcessorFamily>().unwrap(),
            ProcessorFamily::IntelCoreUltra7,
        );
        assert_eq!(
            "M.2 NVMe".parse::<StorageType>().unwrap(),
            StorageType::M2Nvme,
        );
        assert_eq!(GraphicsType::Integrated.to_string(), "Geïntegreerd");
        assert!("GTX".parse::<GraphicsType>().is_err());
    }

    #[test]
    fn deserializes_sparse_specification() {
        let attrs: Specification = serde_json::from_str(
            r#"{
                "processor_family": "intel-core-i7",
                "ram_size": 16,
                "screen_size": 14.0,
                "condition": "Renewed"
            }"#,
        )
        .unwrap();

        assert_eq!(attrs.processor_family, Some(ProcessorFamily::IntelCoreI7));
        assert_eq!(attrs.ram_size.map(super::Gigabytes::get), Some(16));
        assert!(attrs.storage_type.is_none());
        assert!(attrs.operating_system.is_none());

        assert!(serde_json::from_str::<Specification>(r#"{"ram_size": 0}"#)
            .is_err());
        assert!(serde_json::from_str::<Specification>(
            r#"{"graphics_type": "Onboard"}"#
        )
        .is_err());
    }
}
