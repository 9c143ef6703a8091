use crate::db::DbPool;
use crate::models::{DaysSchedule, JobTag, JobType, Profession, Shift};
use crate::schema::{days_schedules, job_tags, job_types, professions, shifts};
use anyhow::Result;
use diesel::prelude::*;

/// Lists all professions ordered by name
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
///
/// ### Returns
///
/// A Result containing the seeded professions
pub fn list_professions(pool: &DbPool) -> Result<Vec<Profession>> {
    let conn = &mut pool.get()?;

    let result = professions::table
        .order_by(professions::name.asc())
        .select(Profession::as_select())
        .load(conn)?;

    Ok(result)
}

/// Retrieves a profession by its name
///
/// Workers address their profession by name on the wire, so this is the
/// lookup used when reading an account payload.
pub fn get_profession_by_name(pool: &DbPool, name: &str) -> Result<Option<Profession>> {
    let conn = &mut pool.get()?;

    let profession = professions::table
        .filter(professions::name.eq(name))
        .select(Profession::as_select())
        .first(conn)
        .optional()?;

    Ok(profession)
}

pub fn list_job_types(pool: &DbPool) -> Result<Vec<JobType>> {
    let conn = &mut pool.get()?;

    let result = job_types::table
        .order_by(job_types::id.asc())
        .select(JobType::as_select())
        .load(conn)?;

    Ok(result)
}

pub fn list_shifts(pool: &DbPool) -> Result<Vec<Shift>> {
    let conn = &mut pool.get()?;

    let result = shifts::table
        .order_by(shifts::id.asc())
        .select(Shift::as_select())
        .load(conn)?;

    Ok(result)
}

pub fn list_days_schedules(pool: &DbPool) -> Result<Vec<DaysSchedule>> {
    let conn = &mut pool.get()?;

    let result = days_schedules::table
        .order_by(days_schedules::id.asc())
        .select(DaysSchedule::as_select())
        .load(conn)?;

    Ok(result)
}

pub fn list_job_tags(pool: &DbPool) -> Result<Vec<JobTag>> {
    let conn = &mut pool.get()?;

    let result = job_tags::table
        .order_by(job_tags::id.asc())
        .select(JobTag::as_select())
        .load(conn)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::tests::setup_test_db;
    use crate::validators::{JOB_TYPES, SCHEDULE, SHIFTS, TAGS};

    fn names<T>(items: &[T], name: impl Fn(&T) -> String) -> Vec<String> {
        items.iter().map(name).collect()
    }

    #[test]
    fn test_seeded_lookups_match_whitelists() {
        let pool = setup_test_db();

        assert_eq!(names(&list_job_types(&pool).unwrap(), JobType::get_name), JOB_TYPES);
        assert_eq!(names(&list_shifts(&pool).unwrap(), Shift::get_name), SHIFTS);
        assert_eq!(names(&list_days_schedules(&pool).unwrap(), DaysSchedule::get_name), SCHEDULE);
        assert_eq!(names(&list_job_tags(&pool).unwrap(), JobTag::get_name), TAGS);
    }

    #[test]
    fn test_professions_sorted() {
        let pool = setup_test_db();

        let professions = names(&list_professions(&pool).unwrap(), Profession::get_name);

        assert!(professions.contains(&"Painter".to_string()));
        let mut sorted = professions.clone();
        sorted.sort();
        assert_eq!(professions, sorted);
    }

    #[test]
    fn test_get_profession_by_name() {
        let pool = setup_test_db();

        let painter = get_profession_by_name(&pool, "Painter").unwrap().unwrap();
        assert_eq!(painter.get_name(), "Painter");
        assert!(get_profession_by_name(&pool, "Astronaut").unwrap().is_none());
    }
}
