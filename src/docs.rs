use crate::api::chrome::ScrollPlan;
use crate::api::employee::EmployeeListResponse;
use crate::model::employee::{EmployeeRecord, EmployeeStats};
use crate::model::imported_row::ImportedRow;
use crate::models::{ChromeUpdate, EmployeeQuery, ImportUpload, LoginReqDto, SignupUpload};
use crate::service::chrome::{ChromeEvent, ChromeState};
use crate::service::importer::ImportedTable;
use crate::service::session_gate::Admitted;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Portal API",
        version = "0.1.0",
        description = r#"
## Employee Portal

Backend for the employee management page.

### 🔹 Key Features
- **Employee Registration**
  - Sign up an employee with a picture, stored as a data URL under the employee id
  - Fetch a registered employee, list employees, dashboard headcount
- **Spreadsheet Import**
  - Upload a workbook and get its first sheet back as table rows
- **Layout State**
  - Sidebar and scroll-to-top state transitions for the page chrome

### 🔐 Security
`/auth/login` is a placeholder that admits any non-empty id and password.
It performs no authentication.

### 📦 Response Format
- JSON bodies; errors are `{ "error": "..." }`
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::employee::signup,
        crate::api::employee::get_employee,
        crate::api::employee::get_picture,
        crate::api::employee::list_employees,
        crate::api::employee::employee_stats,

        crate::api::import::import_spreadsheet,

        crate::api::chrome::apply_chrome_event,
        crate::api::chrome::scroll_plan
    ),
    components(
        schemas(
            LoginReqDto,
            Admitted,
            SignupUpload,
            EmployeeRecord,
            EmployeeStats,
            EmployeeQuery,
            EmployeeListResponse,
            ImportUpload,
            ImportedRow,
            ImportedTable,
            ChromeUpdate,
            ChromeState,
            ChromeEvent,
            ScrollPlan
        )
    ),
    tags(
        (name = "Auth", description = "Placeholder login"),
        (name = "Employee", description = "Employee registration APIs"),
        (name = "Import", description = "Spreadsheet import APIs"),
        (name = "UI", description = "Page chrome state"),
    )
)]
pub struct ApiDoc;
