//! Typed project records.
//!
//! Every optional field is an explicit `Option` slot: `None` means the page
//! did not render the field, `Some("")` never escapes the detail pipeline.

use serde::Serialize;

use super::columns;

/// Identity-carrying record produced for each list row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    /// Absolute URL of the project's summary page.
    #[serde(rename = "Link")]
    pub link: String,
    /// `"<OriginId> <AppId>"`, or empty when the link lacks either.
    #[serde(rename = "DSA AppId")]
    pub app_id: String,
    #[serde(rename = "PTN")]
    pub ptn: String,
    #[serde(rename = "Project Name")]
    pub name: String,
    #[serde(rename = "Project Scope")]
    pub scope: String,
    #[serde(rename = "Project Cert Type")]
    pub cert_type: String,
    #[serde(rename = "Address", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "City", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "Zip", skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

impl ProjectSummary {
    /// Creates the row-level summary known before any detail fetch.
    #[must_use]
    pub fn from_row(link: impl Into<String>, name: impl Into<String>) -> Self {
        let link = link.into();
        let app_id = super::derive_app_id(&link);
        Self {
            link,
            app_id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Projects one column by its export name.
    ///
    /// The six identity columns are always present (possibly empty); the
    /// address columns only when recovered.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&str> {
        match name {
            columns::LINK => Some(&self.link),
            columns::APP_ID => Some(&self.app_id),
            columns::PTN => Some(&self.ptn),
            columns::PROJECT_NAME => Some(&self.name),
            columns::PROJECT_SCOPE => Some(&self.scope),
            columns::CERT_TYPE => Some(&self.cert_type),
            columns::ADDRESS => self.address.as_deref(),
            columns::CITY => self.city.as_deref(),
            columns::ZIP => self.zip.as_deref(),
            _ => None,
        }
    }

    /// Copies the fields a later pipeline stage resolved into `self`.
    ///
    /// Non-empty strings and present options overwrite. The link and appId
    /// stay as recorded from the list row unless `self` has none.
    pub fn merge_from(&mut self, other: &Self) {
        fn take(slot: &mut String, value: &str) {
            if !value.is_empty() {
                value.clone_into(slot);
            }
        }

        if self.link.is_empty() {
            self.link.clone_from(&other.link);
        }
        if self.app_id.is_empty() {
            self.app_id.clone_from(&other.app_id);
        }
        take(&mut self.name, &other.name);
        take(&mut self.ptn, &other.ptn);
        take(&mut self.scope, &other.scope);
        take(&mut self.cert_type, &other.cert_type);
        if other.address.is_some() {
            self.address.clone_from(&other.address);
        }
        if other.city.is_some() {
            self.city.clone_from(&other.city);
        }
        if other.zip.is_some() {
            self.zip.clone_from(&other.zip);
        }
    }
}

/// State of a checkbox indicator that was found on the page.
///
/// A field whose label is missing is `None` at the record level, never
/// `Indicator::No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Indicator {
    Yes,
    No,
}

impl Indicator {
    /// Returns the exported text, `"Yes"` or `"No"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl From<bool> for Indicator {
    fn from(checked: bool) -> Self {
        if checked { Self::Yes } else { Self::No }
    }
}

/// Text fields recovered from the summary page by exact label.
///
/// Variant order is the extraction order of the field mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    OfficeId,
    ApplicationNumber,
    FileNumber,
    PtnNumber,
    OpscNumber,
    ProjectType,
    ProjectClass,
    SpecialType,
    NumberOfIncrements,
    Address,
    City,
    Zip,
    EstimatedAmount,
    ContractedAmount,
    ChangeDocumentAmount,
    FinalProjectCost,
    AdjustmentDate1,
    AdjustmentAmount1,
    AdjustmentDate2,
    AdjustmentAmount2,
    ReceivedDate,
    ApprovedDate,
    ApprovalExtensionDate,
    ClosedDate,
    CompleteSubmittalDate,
}

impl DetailField {
    /// Every field, in mapping-table order.
    pub const ALL: [Self; 25] = [
        Self::OfficeId,
        Self::ApplicationNumber,
        Self::FileNumber,
        Self::PtnNumber,
        Self::OpscNumber,
        Self::ProjectType,
        Self::ProjectClass,
        Self::SpecialType,
        Self::NumberOfIncrements,
        Self::Address,
        Self::City,
        Self::Zip,
        Self::EstimatedAmount,
        Self::ContractedAmount,
        Self::ChangeDocumentAmount,
        Self::FinalProjectCost,
        Self::AdjustmentDate1,
        Self::AdjustmentAmount1,
        Self::AdjustmentDate2,
        Self::AdjustmentAmount2,
        Self::ReceivedDate,
        Self::ApprovedDate,
        Self::ApprovalExtensionDate,
        Self::ClosedDate,
        Self::CompleteSubmittalDate,
    ];

    /// Returns the export column this field is written to.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::OfficeId => "Office ID",
            Self::ApplicationNumber => "Application #",
            Self::FileNumber => "File #",
            Self::PtnNumber => "PTN #",
            Self::OpscNumber => "OPSC #",
            Self::ProjectType => "Project Type",
            Self::ProjectClass => "Project Class",
            Self::SpecialType => "Special Type",
            Self::NumberOfIncrements => "Number of Increments",
            Self::Address => columns::ADDRESS,
            Self::City => columns::CITY,
            Self::Zip => columns::ZIP,
            Self::EstimatedAmount => "Estimated Amount",
            Self::ContractedAmount => "Contracted Amount",
            Self::ChangeDocumentAmount => "Change Document Amount",
            Self::FinalProjectCost => "Final Project Cost",
            Self::AdjustmentDate1 => "Adjustment Date 1",
            Self::AdjustmentAmount1 => "Adjustment Amount 1",
            Self::AdjustmentDate2 => "Adjustment Date 2",
            Self::AdjustmentAmount2 => "Adjustment Amount 2",
            Self::ReceivedDate => "Received Date",
            Self::ApprovedDate => "Approved Date",
            Self::ApprovalExtensionDate => "Approval Extension Date",
            Self::ClosedDate => "Closed Date",
            Self::CompleteSubmittalDate => "Complete Submittal Date",
        }
    }

    /// Looks a field up by its export column.
    #[must_use]
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.column() == name)
    }
}

/// Checkbox indicators on the summary page. The label text is the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorField {
    Sb575,
    NewCampus,
    Modernization,
    AutoFireDetection,
    SprinklerSystem,
    AccessCompliance,
    FireLifeSafety,
    StructuralSafety,
    FieldReview,
    CgsReview,
    Hps,
}

impl IndicatorField {
    pub const ALL: [Self; 11] = [
        Self::Sb575,
        Self::NewCampus,
        Self::Modernization,
        Self::AutoFireDetection,
        Self::SprinklerSystem,
        Self::AccessCompliance,
        Self::FireLifeSafety,
        Self::StructuralSafety,
        Self::FieldReview,
        Self::CgsReview,
        Self::Hps,
    ];

    /// Returns the page label, which doubles as the export column.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Sb575 => "SB 575",
            Self::NewCampus => "New Campus",
            Self::Modernization => "Modernization",
            Self::AutoFireDetection => "Auto Fire Detection",
            Self::SprinklerSystem => "Sprinkler System",
            Self::AccessCompliance => "Access Compliance",
            Self::FireLifeSafety => "Fire & Life Safety",
            Self::StructuralSafety => "Structural Safety",
            Self::FieldReview => "Field Review",
            Self::CgsReview => "CGS Review",
            Self::Hps => "HPS",
        }
    }

    /// Looks an indicator up by its export column.
    #[must_use]
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.label() == name)
    }
}

/// Full record for one project: the summary plus every optional slot.
///
/// Address, City and Zip live on [`ProjectSummary`] so both sheets agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub summary: ProjectSummary,

    #[serde(rename = "Office ID", skip_serializing_if = "Option::is_none")]
    pub office_id: Option<String>,
    #[serde(rename = "Application #", skip_serializing_if = "Option::is_none")]
    pub application_number: Option<String>,
    #[serde(rename = "File #", skip_serializing_if = "Option::is_none")]
    pub file_number: Option<String>,
    #[serde(rename = "PTN #", skip_serializing_if = "Option::is_none")]
    pub ptn_number: Option<String>,
    #[serde(rename = "OPSC #", skip_serializing_if = "Option::is_none")]
    pub opsc_number: Option<String>,
    #[serde(rename = "Project Type", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(rename = "Project Class", skip_serializing_if = "Option::is_none")]
    pub project_class: Option<String>,
    #[serde(rename = "Special Type", skip_serializing_if = "Option::is_none")]
    pub special_type: Option<String>,
    #[serde(rename = "Number of Increments", skip_serializing_if = "Option::is_none")]
    pub number_of_increments: Option<String>,

    #[serde(rename = "Estimated Amount", skip_serializing_if = "Option::is_none")]
    pub estimated_amount: Option<String>,
    #[serde(rename = "Contracted Amount", skip_serializing_if = "Option::is_none")]
    pub contracted_amount: Option<String>,
    #[serde(rename = "Change Document Amount", skip_serializing_if = "Option::is_none")]
    pub change_document_amount: Option<String>,
    #[serde(rename = "Final Project Cost", skip_serializing_if = "Option::is_none")]
    pub final_project_cost: Option<String>,
    #[serde(rename = "Adjustment Date 1", skip_serializing_if = "Option::is_none")]
    pub adjustment_date_1: Option<String>,
    #[serde(rename = "Adjustment Amount 1", skip_serializing_if = "Option::is_none")]
    pub adjustment_amount_1: Option<String>,
    #[serde(rename = "Adjustment Date 2", skip_serializing_if = "Option::is_none")]
    pub adjustment_date_2: Option<String>,
    #[serde(rename = "Adjustment Amount 2", skip_serializing_if = "Option::is_none")]
    pub adjustment_amount_2: Option<String>,

    #[serde(rename = "Received Date", skip_serializing_if = "Option::is_none")]
    pub received_date: Option<String>,
    #[serde(rename = "Approved Date", skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<String>,
    #[serde(rename = "Approval Extension Date", skip_serializing_if = "Option::is_none")]
    pub approval_extension_date: Option<String>,
    #[serde(rename = "Closed Date", skip_serializing_if = "Option::is_none")]
    pub closed_date: Option<String>,
    #[serde(rename = "Complete Submittal Date", skip_serializing_if = "Option::is_none")]
    pub complete_submittal_date: Option<String>,

    #[serde(rename = "SB 575", skip_serializing_if = "Option::is_none")]
    pub sb_575: Option<Indicator>,
    #[serde(rename = "New Campus", skip_serializing_if = "Option::is_none")]
    pub new_campus: Option<Indicator>,
    #[serde(rename = "Modernization", skip_serializing_if = "Option::is_none")]
    pub modernization: Option<Indicator>,
    #[serde(rename = "Auto Fire Detection", skip_serializing_if = "Option::is_none")]
    pub auto_fire_detection: Option<Indicator>,
    #[serde(rename = "Sprinkler System", skip_serializing_if = "Option::is_none")]
    pub sprinkler_system: Option<Indicator>,
    #[serde(rename = "Access Compliance", skip_serializing_if = "Option::is_none")]
    pub access_compliance: Option<Indicator>,
    #[serde(rename = "Fire & Life Safety", skip_serializing_if = "Option::is_none")]
    pub fire_life_safety: Option<Indicator>,
    #[serde(rename = "Structural Safety", skip_serializing_if = "Option::is_none")]
    pub structural_safety: Option<Indicator>,
    #[serde(rename = "Field Review", skip_serializing_if = "Option::is_none")]
    pub field_review: Option<Indicator>,
    #[serde(rename = "CGS Review", skip_serializing_if = "Option::is_none")]
    pub cgs_review: Option<Indicator>,
    #[serde(rename = "HPS", skip_serializing_if = "Option::is_none")]
    pub hps: Option<Indicator>,
}

impl ProjectDetail {
    /// Starts a detail record from an already-populated summary.
    #[must_use]
    pub fn new(summary: ProjectSummary) -> Self {
        Self {
            summary,
            ..Self::default()
        }
    }

    /// Returns the slot backing a text field.
    #[must_use]
    pub fn field(&self, field: DetailField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Fills a text field. Empty values are ignored so an absent field
    /// stays `None`.
    pub fn set_field(&mut self, field: DetailField, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            *self.slot_mut(field) = Some(value);
        }
    }

    /// Returns an indicator's state, `None` when the page had no such label.
    #[must_use]
    pub fn indicator(&self, field: IndicatorField) -> Option<Indicator> {
        match field {
            IndicatorField::Sb575 => self.sb_575,
            IndicatorField::NewCampus => self.new_campus,
            IndicatorField::Modernization => self.modernization,
            IndicatorField::AutoFireDetection => self.auto_fire_detection,
            IndicatorField::SprinklerSystem => self.sprinkler_system,
            IndicatorField::AccessCompliance => self.access_compliance,
            IndicatorField::FireLifeSafety => self.fire_life_safety,
            IndicatorField::StructuralSafety => self.structural_safety,
            IndicatorField::FieldReview => self.field_review,
            IndicatorField::CgsReview => self.cgs_review,
            IndicatorField::Hps => self.hps,
        }
    }

    /// Records an indicator's state.
    pub fn set_indicator(&mut self, field: IndicatorField, value: Indicator) {
        let slot = match field {
            IndicatorField::Sb575 => &mut self.sb_575,
            IndicatorField::NewCampus => &mut self.new_campus,
            IndicatorField::Modernization => &mut self.modernization,
            IndicatorField::AutoFireDetection => &mut self.auto_fire_detection,
            IndicatorField::SprinklerSystem => &mut self.sprinkler_system,
            IndicatorField::AccessCompliance => &mut self.access_compliance,
            IndicatorField::FireLifeSafety => &mut self.fire_life_safety,
            IndicatorField::StructuralSafety => &mut self.structural_safety,
            IndicatorField::FieldReview => &mut self.field_review,
            IndicatorField::CgsReview => &mut self.cgs_review,
            IndicatorField::Hps => &mut self.hps,
        };
        *slot = Some(value);
    }

    /// Projects one column by its export name, `None` when absent.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.summary.column(name) {
            return Some(value);
        }
        if let Some(field) = DetailField::from_column(name) {
            return self.field(field);
        }
        IndicatorField::from_column(name)
            .and_then(|field| self.indicator(field))
            .map(Indicator::as_str)
    }

    fn slot(&self, field: DetailField) -> &Option<String> {
        match field {
            DetailField::OfficeId => &self.office_id,
            DetailField::ApplicationNumber => &self.application_number,
            DetailField::FileNumber => &self.file_number,
            DetailField::PtnNumber => &self.ptn_number,
            DetailField::OpscNumber => &self.opsc_number,
            DetailField::ProjectType => &self.project_type,
            DetailField::ProjectClass => &self.project_class,
            DetailField::SpecialType => &self.special_type,
            DetailField::NumberOfIncrements => &self.number_of_increments,
            DetailField::Address => &self.summary.address,
            DetailField::City => &self.summary.city,
            DetailField::Zip => &self.summary.zip,
            DetailField::EstimatedAmount => &self.estimated_amount,
            DetailField::ContractedAmount => &self.contracted_amount,
            DetailField::ChangeDocumentAmount => &self.change_document_amount,
            DetailField::FinalProjectCost => &self.final_project_cost,
            DetailField::AdjustmentDate1 => &self.adjustment_date_1,
            DetailField::AdjustmentAmount1 => &self.adjustment_amount_1,
            DetailField::AdjustmentDate2 => &self.adjustment_date_2,
            DetailField::AdjustmentAmount2 => &self.adjustment_amount_2,
            DetailField::ReceivedDate => &self.received_date,
            DetailField::ApprovedDate => &self.approved_date,
            DetailField::ApprovalExtensionDate => &self.approval_extension_date,
            DetailField::ClosedDate => &self.closed_date,
            DetailField::CompleteSubmittalDate => &self.complete_submittal_date,
        }
    }

    fn slot_mut(&mut self, field: DetailField) -> &mut Option<String> {
        match field {
            DetailField::OfficeId => &mut self.office_id,
            DetailField::ApplicationNumber => &mut self.application_number,
            DetailField::FileNumber => &mut self.file_number,
            DetailField::PtnNumber => &mut self.ptn_number,
            DetailField::OpscNumber => &mut self.opsc_number,
            DetailField::ProjectType => &mut self.project_type,
            DetailField::ProjectClass => &mut self.project_class,
            DetailField::SpecialType => &mut self.special_type,
            DetailField::NumberOfIncrements => &mut self.number_of_increments,
            DetailField::Address => &mut self.summary.address,
            DetailField::City => &mut self.summary.city,
            DetailField::Zip => &mut self.summary.zip,
            DetailField::EstimatedAmount => &mut self.estimated_amount,
            DetailField::ContractedAmount => &mut self.contracted_amount,
            DetailField::ChangeDocumentAmount => &mut self.change_document_amount,
            DetailField::FinalProjectCost => &mut self.final_project_cost,
            DetailField::AdjustmentDate1 => &mut self.adjustment_date_1,
            DetailField::AdjustmentAmount1 => &mut self.adjustment_amount_1,
            DetailField::AdjustmentDate2 => &mut self.adjustment_date_2,
            DetailField::AdjustmentAmount2 => &mut self.adjustment_amount_2,
            DetailField::ReceivedDate => &mut self.received_date,
            DetailField::ApprovedDate => &mut self.approved_date,
            DetailField::ApprovalExtensionDate => &mut self.approval_extension_date,
            DetailField::ClosedDate => &mut self.closed_date,
            DetailField::CompleteSubmittalDate => &mut self.complete_submittal_date,
        }
    }
}
