//! Employees screen: record, role and the create/edit form

use crate::core::comparator::{SortKind, SortSpec};
use crate::core::field::{FieldValue, ToFieldValue};
use crate::core::pipeline::{ListDescriptor, Tab};
use crate::core::validation::forms::push_error;
use crate::core::validation::validators::error;
use crate::core::validation::{FormMode, FormModel, filters, validate_phone};
use crate::export::ExportColumns;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator::{Validate, ValidationErrors};

/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 6;

/// Role of a staff member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Admin,
    Manager,
    Operator,
    Courier,
}

impl EmployeeRole {
    pub const ALL: [EmployeeRole; 4] = [
        EmployeeRole::Admin,
        EmployeeRole::Manager,
        EmployeeRole::Operator,
        EmployeeRole::Courier,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeRole::Admin => "admin",
            EmployeeRole::Manager => "manager",
            EmployeeRole::Operator => "operator",
            EmployeeRole::Courier => "courier",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmployeeRole::Admin => "Administrator",
            EmployeeRole::Manager => "Manager",
            EmployeeRole::Operator => "Operator",
            EmployeeRole::Courier => "Courier",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = filters::lowercase(raw);
        Self::ALL.into_iter().find(|r| r.as_str() == raw)
    }
}

impl ToFieldValue for EmployeeRole {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.as_str().to_string())
    }
}

crate::impl_entity!(Employee, "employees", "employee", {
    name: String,
    phone: String,
    role: EmployeeRole,
    #[serde(default)]
    branch: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    start_date: String,
});

impl Employee {
    pub fn descriptor() -> ListDescriptor {
        let mut tabs = vec![Tab::all("all", "All")];
        tabs.extend(
            EmployeeRole::ALL
                .into_iter()
                .map(|r| Tab::new(r.as_str(), r.label(), r.as_str())),
        );

        ListDescriptor::new("employees")
            .search(["name", "phone", "branch"])
            .select_with_options("role", EmployeeRole::ALL.map(EmployeeRole::as_str))
            .select("branch")
            .date_range("start_date")
            .sort("name", SortKind::Text)
            .sort("start_date", SortKind::Date)
            .tabs("role", tabs)
            .default_sort(SortSpec::asc("name"))
    }

    pub fn export_columns() -> ExportColumns {
        ExportColumns::new()
            .column("id", "ID")
            .column("name", "Name")
            .column("phone", "Phone")
            .column("role", "Role")
            .column("branch", "Branch")
            .column("start_date", "Start date")
    }
}

/// Create/edit form for an employee
///
/// The password is never read back from a record: an edit form starts with
/// blank password fields and the password is only sent when typed in.
#[derive(Debug, Clone, Default, Validate)]
pub struct EmployeeForm {
    pub mode: FormMode,

    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,

    pub branch: String,

    pub start_date: String,

    pub password: String,

    pub password_confirmation: String,
}

impl EmployeeForm {
    /// Blank form for a new employee
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing record, password left blank
    pub fn for_edit(employee: &Employee) -> Self {
        Self {
            mode: FormMode::Edit,
            name: employee.name.clone(),
            phone: employee.phone.clone(),
            role: employee.role.as_str().to_string(),
            branch: employee.branch.clone(),
            start_date: employee.start_date.clone(),
            password: String::new(),
            password_confirmation: String::new(),
        }
    }
}

impl FormModel for EmployeeForm {
    fn normalize(&mut self) {
        self.name = filters::trim(&self.name);
        self.phone = filters::phone_digits(&self.phone);
        self.role = filters::lowercase(&self.role);
        self.branch = filters::trim(&self.branch);
        self.start_date = filters::trim(&self.start_date);
    }

    fn check(&self) -> Result<(), ValidationErrors> {
        let mut result = self.validate();

        if !self.role.is_empty() && EmployeeRole::parse(&self.role).is_none() {
            result = push_error(
                result,
                "role",
                error("role", format!("Unknown role '{}'", self.role)),
            );
        }

        if self.password.is_empty() {
            if self.mode == FormMode::Create {
                result = push_error(result, "password", error("required", "Password is required"));
            }
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            result = push_error(
                result,
                "password",
                error(
                    "length",
                    format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
                ),
            );
        }

        if self.password != self.password_confirmation {
            result = push_error(
                result,
                "password_confirmation",
                error("must_match", "Passwords do not match"),
            );
        }

        result
    }

    fn to_payload(&self) -> Value {
        let mut payload = json!({
            "name": self.name,
            "phone": self.phone,
            "role": self.role,
            "branch": self.branch,
            "start_date": self.start_date,
        });
        if !self.password.is_empty() {
            payload["password"] = json!(self.password);
        }
        payload
    }
}
