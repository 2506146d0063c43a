//! Interactive menu
//!
//! An explicit loop: show the menu, dispatch the chosen command, come back.
//! Errors from a command are reported and the loop continues; only a broken
//! terminal ends it early.

use anyhow::Result;
use inquire::{InquireError, Select};
use std::fmt;

use crate::error::AppError;
use crate::store::{NewEmployee, Store};

pub mod prompts;
pub mod render;

use prompts::{Choice, Pick};

/// Every command the menu offers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    ViewDepartments,
    ViewRoles,
    ViewEmployees,
    ViewEmployeesByDepartment,
    ViewEmployeesByManager,
    ViewDepartmentBudget,
    AddDepartment,
    AddRole,
    AddEmployee,
    UpdateEmployeeRole,
    UpdateEmployeeManager,
    DeleteDepartment,
    DeleteRole,
    DeleteEmployee,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 15] = [
        MenuChoice::ViewDepartments,
        MenuChoice::ViewRoles,
        MenuChoice::ViewEmployees,
        MenuChoice::ViewEmployeesByDepartment,
        MenuChoice::ViewEmployeesByManager,
        MenuChoice::ViewDepartmentBudget,
        MenuChoice::AddDepartment,
        MenuChoice::AddRole,
        MenuChoice::AddEmployee,
        MenuChoice::UpdateEmployeeRole,
        MenuChoice::UpdateEmployeeManager,
        MenuChoice::DeleteDepartment,
        MenuChoice::DeleteRole,
        MenuChoice::DeleteEmployee,
        MenuChoice::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::ViewDepartments => "View all departments",
            MenuChoice::ViewRoles => "View all roles",
            MenuChoice::ViewEmployees => "View all employees",
            MenuChoice::ViewEmployeesByDepartment => "View employees by department",
            MenuChoice::ViewEmployeesByManager => "View employees by manager",
            MenuChoice::ViewDepartmentBudget => "View department budget",
            MenuChoice::AddDepartment => "Add a department",
            MenuChoice::AddRole => "Add a role",
            MenuChoice::AddEmployee => "Add an employee",
            MenuChoice::UpdateEmployeeRole => "Update an employee role",
            MenuChoice::UpdateEmployeeManager => "Update an employee manager",
            MenuChoice::DeleteDepartment => "Delete a department",
            MenuChoice::DeleteRole => "Delete a role",
            MenuChoice::DeleteEmployee => "Delete an employee",
            MenuChoice::Exit => "Exit",
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the loop keeps going after a command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Run the menu until the person exits
pub async fn run(store: &Store) -> Result<()> {
    loop {
        let choice = match Select::new("What would you like to do?", MenuChoice::ALL.to_vec())
            .with_page_size(MenuChoice::ALL.len())
            .prompt()
        {
            Ok(choice) => choice,
            Err(e) if prompts::is_cancel(&e) => MenuChoice::Exit,
            Err(e) => return Err(e.into()),
        };

        match dispatch(store, choice).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => {
                println!("Goodbye!");
                return Ok(());
            }
            Err(err) => report(err)?,
        }
    }
}

/// Show a command failure; anything that is not a store error or a
/// cancelled prompt is passed back as fatal.
fn report(err: anyhow::Error) -> Result<()> {
    if let Some(app) = err.downcast_ref::<AppError>() {
        println!("Error: {}", app.user_message());
        return Ok(());
    }
    if let Some(prompt) = err.downcast_ref::<InquireError>() {
        if prompts::is_cancel(prompt) {
            println!("Cancelled.");
            return Ok(());
        }
    }
    Err(err)
}

async fn dispatch(store: &Store, choice: MenuChoice) -> Result<Flow> {
    match choice {
        MenuChoice::ViewDepartments => {
            println!("{}", render::departments(&store.list_departments().await?));
        }
        MenuChoice::ViewRoles => {
            println!("{}", render::roles(&store.list_roles().await?));
        }
        MenuChoice::ViewEmployees => {
            println!("{}", render::employees(&store.list_employees().await?));
        }
        MenuChoice::ViewEmployeesByDepartment => {
            if let Some(id) = pick_department(store, "Select a department:", false).await? {
                println!("{}", render::employees(&store.employees_by_department(id).await?));
            }
        }
        MenuChoice::ViewEmployeesByManager => {
            if let Some(id) = pick_employee(store, "Select a manager:", None).await? {
                println!("{}", render::employees(&store.employees_by_manager(id).await?));
            }
        }
        MenuChoice::ViewDepartmentBudget => view_budget(store).await?,
        MenuChoice::AddDepartment => {
            add_department(store).await?;
        }
        MenuChoice::AddRole => {
            add_role(store).await?;
        }
        MenuChoice::AddEmployee => add_employee(store).await?,
        MenuChoice::UpdateEmployeeRole => update_employee_role(store).await?,
        MenuChoice::UpdateEmployeeManager => update_employee_manager(store).await?,
        MenuChoice::DeleteDepartment => delete_department(store).await?,
        MenuChoice::DeleteRole => delete_role(store).await?,
        MenuChoice::DeleteEmployee => delete_employee(store).await?,
        MenuChoice::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

// Entity pickers. The `allow_new` variants offer inline creation and chain
// the generated id into the pending command.

async fn department_choices(store: &Store, allow_new: bool) -> Result<Vec<Choice<Pick>>> {
    let mut choices: Vec<Choice<Pick>> = store
        .list_departments()
        .await?
        .into_iter()
        .map(|d| Choice::new(d.name, Pick::Existing(d.id)))
        .collect();
    if allow_new {
        choices.push(Choice::new("+ Create a new department", Pick::New));
    }
    Ok(choices)
}

async fn pick_department(store: &Store, message: &str, allow_new: bool) -> Result<Option<i32>> {
    let choices = department_choices(store, allow_new).await?;
    match prompts::select(message, choices)? {
        Some(Pick::Existing(id)) => Ok(Some(id)),
        Some(Pick::New) => Ok(Some(add_department(store).await?)),
        Some(Pick::Nothing) | None => {
            println!("There are no departments yet.");
            Ok(None)
        }
    }
}

async fn pick_role(store: &Store, message: &str, allow_new: bool) -> Result<Option<i32>> {
    let mut choices: Vec<Choice<Pick>> = store
        .list_roles()
        .await?
        .into_iter()
        .map(|r| Choice::new(format!("{} ({})", r.title, r.department), Pick::Existing(r.id)))
        .collect();
    if allow_new {
        choices.push(Choice::new("+ Create a new role", Pick::New));
    }

    match prompts::select(message, choices)? {
        Some(Pick::Existing(id)) => Ok(Some(id)),
        Some(Pick::New) => Ok(Some(add_role(store).await?)),
        Some(Pick::Nothing) | None => {
            println!("There are no roles yet.");
            Ok(None)
        }
    }
}

/// Pick an employee, leaving out `exclude`
async fn pick_employee(store: &Store, message: &str, exclude: Option<i32>) -> Result<Option<i32>> {
    let choices: Vec<Choice<i32>> = store
        .list_employees()
        .await?
        .into_iter()
        .filter(|e| Some(e.id) != exclude)
        .map(|e| Choice::new(format!("{} ({})", e.full_name(), e.title), e.id))
        .collect();

    let picked = prompts::select(message, choices)?;
    if picked.is_none() {
        println!("There are no employees to choose from.");
    }
    Ok(picked)
}

/// Optional manager; "No manager" is always offered first
async fn pick_manager(store: &Store, exclude: Option<i32>) -> Result<Option<i32>> {
    let mut choices = vec![Choice::new("No manager", Pick::Nothing)];
    choices.extend(
        store
            .list_employees()
            .await?
            .into_iter()
            .filter(|e| Some(e.id) != exclude)
            .map(|e| Choice::new(e.full_name(), Pick::Existing(e.id))),
    );

    match prompts::select("Select the manager:", choices)? {
        Some(Pick::Existing(id)) => Ok(Some(id)),
        _ => Ok(None),
    }
}

// Commands

async fn view_budget(store: &Store) -> Result<()> {
    let departments = store.list_departments().await?;
    let choices = departments
        .iter()
        .map(|d| Choice::new(d.name.clone(), d.id))
        .collect();

    let Some(id) = prompts::select("Select a department:", choices)? else {
        println!("There are no departments yet.");
        return Ok(());
    };
    let name = departments
        .iter()
        .find(|d| d.id == id)
        .map(|d| d.name.as_str())
        .unwrap_or_default();

    let budget = store.department_budget(id).await?;
    println!("{}", render::budget(name, budget.as_ref()));
    Ok(())
}

/// A rejected input is shown and the prompt repeats; other failures end the command
fn retry_on_invalid(err: AppError) -> Result<()> {
    match err {
        AppError::Validation(msg) => {
            println!("{} Please try again.", msg);
            Ok(())
        }
        other => Err(other.into()),
    }
}

async fn add_department(store: &Store) -> Result<i32> {
    loop {
        let name =
            prompts::required_text("Enter the name of the new department:", "Department name")?;
        match store.add_department(&name).await {
            Ok(id) => {
                println!("Department '{}' added.", name.trim());
                return Ok(id);
            }
            Err(err) => retry_on_invalid(err)?,
        }
    }
}

async fn add_role(store: &Store) -> Result<i32> {
    let mut department_id = None;
    loop {
        let title = prompts::required_text("Enter the title of the new role:", "Role title")?;
        let salary = prompts::salary("Enter the salary for the new role:")?;
        let department = match department_id {
            Some(id) => id,
            None => {
                let Some(id) =
                    pick_department(store, "Which department does the role belong to?", true)
                        .await?
                else {
                    anyhow::bail!(InquireError::OperationCanceled);
                };
                department_id = Some(id);
                id
            }
        };

        match store.add_role(&title, salary, department).await {
            Ok(id) => {
                println!("Role '{}' added.", title.trim());
                return Ok(id);
            }
            Err(err) => retry_on_invalid(err)?,
        }
    }
}

async fn add_employee(store: &Store) -> Result<()> {
    let mut picked = None;
    loop {
        let first_name = prompts::required_text("Enter the employee's first name:", "First name")?;
        let last_name = prompts::required_text("Enter the employee's last name:", "Last name")?;
        let (role_id, manager_id) = match picked {
            Some(ids) => ids,
            None => {
                let Some(role_id) = pick_role(store, "Select the employee's role:", true).await?
                else {
                    return Ok(());
                };
                let ids = (role_id, pick_manager(store, None).await?);
                picked = Some(ids);
                ids
            }
        };

        let added = store
            .add_employee(NewEmployee {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                role_id,
                manager_id,
            })
            .await;
        match added {
            Ok(_) => {
                println!(
                    "Employee '{} {}' added.",
                    first_name.trim(),
                    last_name.trim()
                );
                return Ok(());
            }
            Err(err) => retry_on_invalid(err)?,
        }
    }
}

async fn update_employee_role(store: &Store) -> Result<()> {
    let Some(employee_id) = pick_employee(store, "Select the employee to update:", None).await?
    else {
        return Ok(());
    };
    let Some(role_id) = pick_role(store, "Select the new role:", true).await? else {
        return Ok(());
    };

    store.update_employee_role(employee_id, role_id).await?;
    println!("Employee role updated.");
    Ok(())
}

async fn update_employee_manager(store: &Store) -> Result<()> {
    let Some(employee_id) = pick_employee(store, "Select the employee to update:", None).await?
    else {
        return Ok(());
    };
    let manager_id = pick_manager(store, Some(employee_id)).await?;

    store.update_employee_manager(employee_id, manager_id).await?;
    println!("Employee manager updated.");
    Ok(())
}

async fn delete_department(store: &Store) -> Result<()> {
    let Some(id) = pick_department(store, "Select the department to delete:", false).await? else {
        return Ok(());
    };

    let confirmed = prompts::confirm(
        "This deletes the department, all of its roles and every employee holding them. Continue?",
    )?;
    if !confirmed {
        println!("Nothing deleted.");
        return Ok(());
    }

    let report = store.delete_department(id).await?;
    println!("{}", render::cascade_summary(&report));
    Ok(())
}

async fn delete_role(store: &Store) -> Result<()> {
    let Some(id) = pick_role(store, "Select the role to delete:", false).await? else {
        return Ok(());
    };

    let confirmed =
        prompts::confirm("This deletes the role and every employee holding it. Continue?")?;
    if !confirmed {
        println!("Nothing deleted.");
        return Ok(());
    }

    let report = store.delete_role(id).await?;
    println!("{}", render::cascade_summary(&report));
    Ok(())
}

async fn delete_employee(store: &Store) -> Result<()> {
    let Some(id) = pick_employee(store, "Select the employee to delete:", None).await? else {
        return Ok(());
    };

    let report = store.delete_employee(id).await?;
    println!("{}", render::cascade_summary(&report));
    Ok(())
}
