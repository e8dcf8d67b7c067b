use crate::infra::GymServices;
use chrono::{Datelike, Days, Local, NaiveTime};
use clap::Args;
use gym_desk::config::MembershipConfig;
use gym_desk::error::AppError;
use gym_desk::workflows::calendar::EventDraft;
use gym_desk::workflows::enrollment::{
    next_identifier, AdministratorProfileEdit, EnrollmentPrefix,
};
use gym_desk::workflows::members::{ProfileFilter, ProfileUpdate, RegistrationForm};
use gym_desk::workflows::training::{ExerciseDraft, ExerciseKind, ProgramDraft, ProgramFilter};

const DEMO_STAFF_DOMAIN: &str = "staff.gym.example";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Year to issue enrollment numbers for. Defaults to the current year.
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// How many enrollment numbers to issue before assigning one.
    #[arg(long, default_value_t = 3)]
    pub(crate) issue: u16,
}

#[derive(Args, Debug)]
pub(crate) struct NextEnrollmentArgs {
    /// Year to compute the identifier for. Defaults to the current year.
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Identifiers already issued or assigned (repeatable)
    #[arg(long)]
    pub(crate) existing: Vec<String>,
}

pub(crate) fn run_next_enrollment(args: NextEnrollmentArgs) -> Result<(), AppError> {
    let NextEnrollmentArgs { year, existing } = args;
    let year = year.unwrap_or_else(|| Local::now().year());
    let prefix = EnrollmentPrefix::try_for_year(year)?;
    let identifier = next_identifier(&prefix, existing.iter().map(String::as_str))?;
    println!("{identifier}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { year, issue } = args;
    let year = year.unwrap_or_else(|| Local::now().year());
    let membership = MembershipConfig::with_staff_domain(DEMO_STAFF_DOMAIN)?;
    let services = GymServices::in_memory(membership);

    println!("Gym desk demo ({year})");
    let admin = services
        .members
        .register(form("coach", &format!("coach@{DEMO_STAFF_DOMAIN}"), "Head Coach"))?;
    let ana = services
        .members
        .register(form("ana", "ana@mail.example", "Ana Souza"))?;
    let bia = services
        .members
        .register(form("bia", "bia@mail.example", "Beatriz Lima"))?;
    println!(
        "- Registered {} (administrator: {}), {} and {}",
        admin.account.username, admin.account.is_staff, ana.account.username, bia.account.username
    );

    println!("\nEnrollment issuance");
    let mut issued = Vec::new();
    for _ in 0..issue {
        let record = services.enrollment.issue_for_year(&admin.account, year)?;
        println!("  - issued {}", record.identifier);
        issued.push(record.identifier);
    }

    if let Some(first) = issued.first() {
        let saved = services.enrollment.edit_profile(
            &admin.account,
            ana.profile.id,
            AdministratorProfileEdit {
                full_name: Some("Ana Souza".to_string()),
                enrollment: Some(first.to_string()),
            },
        )?;
        println!(
            "- Assigned {} to {}",
            first,
            saved.display_name(&ana.account)
        );

        if let Some(second) = issued.get(1) {
            let attempt = services.enrollment.edit_profile(
                &admin.account,
                ana.profile.id,
                AdministratorProfileEdit {
                    full_name: None,
                    enrollment: Some(second.to_string()),
                },
            );
            match attempt {
                Ok(_) => println!("  Reassignment unexpectedly accepted"),
                Err(err) => println!("  Reassignment to {second} refused: {err}"),
            }
        }
    }

    let available = services.enrollment.available(&admin.account)?;
    println!("Available pool ({} entries, newest first):", available.len());
    for record in &available {
        println!("  - {} [{}]", record.identifier, record.status_label());
    }

    services.members.update_own_profile(
        &ana.account,
        ProfileUpdate {
            full_name: Some("Ana S. Souza".to_string()),
            email: Some("ana.souza@mail.example".to_string()),
        },
    )?;
    println!("\nMember directory");
    for profile in services
        .members
        .list_profiles(&admin.account, &ProfileFilter::default())?
    {
        println!(
            "  - {} | enrollment {}",
            profile.full_name.as_deref().unwrap_or("(no name)"),
            profile
                .enrollment
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string())
        );
    }

    println!("\nTraining");
    let squat = services.training.create_exercise(
        &admin.account,
        ExerciseDraft {
            name: "Back squat".to_string(),
            kind: ExerciseKind::Strength,
        },
    )?;
    let program = services.training.create_program(
        &ana.account,
        ProgramDraft {
            owner: None,
            exercise: squat.id,
            program_name: "Leg day".to_string(),
            muscle_group: Some("legs".to_string()),
            sets: 4,
            repetitions: 8,
            load_kg: 40,
            minutes: 0,
            video_url: None,
        },
    )?;
    let visible = services
        .training
        .programs(&ana.account, &ProgramFilter::default())?;
    println!(
        "- {} created '{}' on {} [{}] ({} x {} @ {} kg); {} program(s) visible to them",
        ana.account.username,
        program.fields.program_name,
        squat.fields.name,
        squat.fields.kind.label(),
        program.fields.sets,
        program.fields.repetitions,
        program.fields.load_kg,
        visible.len()
    );

    println!("\nCalendar");
    let today = Local::now().date_naive();
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
    services.calendar.create_event(
        &admin.account,
        EventDraft {
            title: "Morning spinning".to_string(),
            description: "Indoor cycling for all levels".to_string(),
            start_date: today,
            end_date: tomorrow,
            start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default(),
            end_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            capacity: 20,
            subscriptions: 0,
        },
    )?;
    let summary = services.calendar.summary(&bia.account, today)?;
    println!(
        "- {} sees {} event(s) today, {} this week, {} in total",
        bia.account.username, summary.today, summary.week, summary.total
    );

    Ok(())
}

fn form(username: &str, email: &str, full_name: &str) -> RegistrationForm {
    RegistrationForm {
        username: username.to_string(),
        email: email.to_string(),
        full_name: full_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gym_desk::workflows::enrollment::IssuanceError;

    #[test]
    fn next_enrollment_rejects_years_outside_the_format() {
        let result = run_next_enrollment(NextEnrollmentArgs {
            year: Some(99),
            existing: Vec::new(),
        });

        assert!(matches!(
            result,
            Err(AppError::Issuance(IssuanceError::InvalidYear(99)))
        ));
    }

    #[test]
    fn next_enrollment_accepts_existing_identifiers() {
        run_next_enrollment(NextEnrollmentArgs {
            year: Some(2024),
            existing: vec!["20241110001".to_string(), "garbage".to_string()],
        })
        .expect("computes the next identifier");
    }

    #[test]
    fn demo_runs_end_to_end() {
        run_demo(DemoArgs {
            year: Some(2024),
            issue: 3,
        })
        .expect("demo completes");
    }
}
