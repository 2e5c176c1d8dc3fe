use chrono::NaiveDate;
use photostaff_core::db::open_db_in_memory;
use photostaff_core::{
    AssignmentError, AssignmentRepository, AssignmentService, Event, EventId, EventRepository,
    Photographer, PhotographerId, PhotographerRepository, PhotographerService,
    SqliteAssignmentRepository, SqliteEventRepository, SqlitePhotographerRepository,
};
use rusqlite::Connection;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    day(2030, 1, 1)
}

fn shoot_day() -> NaiveDate {
    day(2030, 6, 1)
}

fn insert_event(conn: &Connection, name: &str, event_date: NaiveDate, required: i64) -> Event {
    let event = Event::new(name, event_date, required);
    SqliteEventRepository::new(conn).create_event(&event).unwrap();
    event
}

/// Registers photographers and returns their ids in selection order.
fn register(conn: &Connection, count: usize) -> Vec<PhotographerId> {
    let service = PhotographerService::new(SqlitePhotographerRepository::new(conn));
    let mut ids = (0..count)
        .map(|index| {
            service
                .register_photographer(
                    format!("Photographer {index}"),
                    format!("p{index}@example.com"),
                    "555-0100",
                )
                .unwrap()
                .id
        })
        .collect::<Vec<_>>();
    ids.sort();
    ids
}

fn assignment_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM assignments;", [], |row| row.get(0))
        .unwrap()
}

fn assigned_ids(conn: &Connection, event_id: EventId) -> Vec<PhotographerId> {
    SqliteAssignmentRepository::new(conn)
        .list_assignments(Some(event_id))
        .unwrap()
        .into_iter()
        .map(|assignment| assignment.photographer_id)
        .collect()
}

#[test]
fn assign_staffs_event_with_lowest_ids_first() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    let ids = register(&conn, 3);
    let event = insert_event(&conn, "E1", shoot_day(), 2);

    let outcome = engine.assign_on(event.id, today()).unwrap();

    assert_eq!(outcome.event_id, event.id);
    assert_eq!(
        outcome
            .assigned_photographers
            .iter()
            .map(|p| p.id)
            .collect::<Vec<_>>(),
        ids[..2]
    );
    assert_eq!(outcome.assignments.len(), 2);
    assert!(outcome
        .assignments
        .iter()
        .all(|assignment| assignment.event_id == event.id));
    assert_eq!(assigned_ids(&conn, event.id), ids[..2]);
    assert_eq!(assignment_count(&conn), 2);
}

#[test]
fn assign_accepts_event_on_reference_day() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    register(&conn, 1);
    let event = insert_event(&conn, "Today", today(), 1);

    engine.assign_on(event.id, today()).unwrap();
}

#[test]
fn past_event_is_rejected_with_invalid_date() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    register(&conn, 3);
    let event = insert_event(&conn, "Yesterday", day(2029, 12, 31), 1);

    let err = engine.assign_on(event.id, today()).unwrap_err();
    assert!(matches!(
        err,
        AssignmentError::InvalidDate { event_date, today: reference }
            if event_date == day(2029, 12, 31) && reference == today()
    ));
    assert_eq!(err.code(), "invalid_date");
    assert_eq!(assignment_count(&conn), 0);
}

#[test]
fn past_date_is_checked_before_requirement() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    let event = insert_event(&conn, "Old and empty", day(2029, 1, 1), 0);

    let err = engine.assign_on(event.id, today()).unwrap_err();
    assert!(matches!(err, AssignmentError::InvalidDate { .. }));
}

#[test]
fn non_positive_requirement_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    register(&conn, 2);

    for required in [0, -1, i64::MIN] {
        let event = insert_event(&conn, "Bad headcount", shoot_day(), required);
        let err = engine.assign_on(event.id, today()).unwrap_err();
        assert!(
            matches!(err, AssignmentError::InvalidRequirement { required: got } if got == required),
            "required={required} gave {err}"
        );
    }
    assert_eq!(assignment_count(&conn), 0);
}

#[test]
fn second_assign_fails_with_already_assigned_and_keeps_rows() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    register(&conn, 4);
    let event = insert_event(&conn, "Once", shoot_day(), 2);

    engine.assign_on(event.id, today()).unwrap();
    let before = assigned_ids(&conn, event.id);

    for _ in 0..2 {
        let err = engine.assign_on(event.id, today()).unwrap_err();
        assert!(matches!(err, AssignmentError::AlreadyAssigned(id) if id == event.id));
    }
    assert_eq!(assigned_ids(&conn, event.id), before);
    assert_eq!(assignment_count(&conn), 2);
}

#[test]
fn insufficient_availability_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    register(&conn, 2);
    let event = insert_event(&conn, "Big", shoot_day(), 3);

    let err = engine.assign_on(event.id, today()).unwrap_err();
    assert!(matches!(
        err,
        AssignmentError::InsufficientAvailability {
            required: 3,
            available: 2
        }
    ));
    assert_eq!(assignment_count(&conn), 0);
}

#[test]
fn inactive_photographers_are_never_selected() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    let photographers = PhotographerService::new(SqlitePhotographerRepository::new(&conn));
    let ids = register(&conn, 3);
    photographers.set_active(ids[0], false).unwrap();

    let event = insert_event(&conn, "E", shoot_day(), 2);
    let outcome = engine.assign_on(event.id, today()).unwrap();
    assert_eq!(
        outcome
            .assigned_photographers
            .iter()
            .map(|p| p.id)
            .collect::<Vec<_>>(),
        ids[1..]
    );

    let other = insert_event(&conn, "Other", day(2030, 6, 2), 3);
    let err = engine.assign_on(other.id, today()).unwrap_err();
    assert!(matches!(
        err,
        AssignmentError::InsufficientAvailability {
            required: 3,
            available: 2
        }
    ));
}

#[test]
fn same_day_events_share_one_pool_in_sequence() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    let repo = SqliteAssignmentRepository::new(&conn);
    let ids = register(&conn, 3);

    let e1 = insert_event(&conn, "E1", shoot_day(), 2);
    let e2 = insert_event(&conn, "E2", shoot_day(), 1);
    let e3 = insert_event(&conn, "E3", shoot_day(), 1);

    engine.assign_on(e1.id, today()).unwrap();
    assert_eq!(assigned_ids(&conn, e1.id), ids[..2]);
    let busy = repo.busy_photographer_ids_on(shoot_day()).unwrap();
    assert_eq!(busy.len(), 2);
    assert_eq!(repo.active_photographers_excluding(&busy).unwrap().len(), 1);

    let outcome = engine.assign_on(e2.id, today()).unwrap();
    assert_eq!(outcome.assigned_photographers.len(), 1);
    assert_eq!(outcome.assigned_photographers[0].id, ids[2]);

    let err = engine.assign_on(e3.id, today()).unwrap_err();
    assert!(matches!(
        err,
        AssignmentError::InsufficientAvailability {
            required: 1,
            available: 0
        }
    ));
    assert!(assigned_ids(&conn, e3.id).is_empty());

    let schedule = engine.schedule(ids[0]).unwrap();
    assert_eq!(schedule.iter().map(|e| e.id).collect::<Vec<_>>(), [e1.id]);
    let schedule = engine.schedule(ids[2]).unwrap();
    assert_eq!(schedule.iter().map(|e| e.id).collect::<Vec<_>>(), [e2.id]);
}

#[test]
fn other_dates_do_not_block_photographers() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    let ids = register(&conn, 2);

    let saturday = insert_event(&conn, "Sat", day(2030, 6, 1), 2);
    let sunday = insert_event(&conn, "Sun", day(2030, 6, 2), 2);
    engine.assign_on(saturday.id, today()).unwrap();
    engine.assign_on(sunday.id, today()).unwrap();

    let schedule = engine.schedule(ids[0]).unwrap();
    assert_eq!(
        schedule.iter().map(|e| e.id).collect::<Vec<_>>(),
        [saturday.id, sunday.id]
    );
}

#[test]
fn no_photographer_is_booked_twice_on_one_date() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    register(&conn, 5);

    let dates = [day(2030, 6, 1), day(2030, 6, 2)];
    let mut outcomes = Vec::new();
    for (index, required) in [2, 1, 2, 3, 1, 2, 4].into_iter().enumerate() {
        let event = insert_event(
            &conn,
            &format!("E{index}"),
            dates[index % dates.len()],
            required,
        );
        outcomes.push(engine.assign_on(event.id, today()).is_ok());
    }
    assert!(outcomes.iter().any(|ok| *ok));
    assert!(outcomes.iter().any(|ok| !*ok));

    let mut stmt = conn
        .prepare(
            "SELECT e.event_date, a.photographer_id
             FROM assignments a
             INNER JOIN events e ON e.id = a.event_id;",
        )
        .unwrap();
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let mut per_date: HashMap<String, BTreeSet<String>> = HashMap::new();
    for (date, photographer_id) in &rows {
        assert!(
            per_date
                .entry(date.clone())
                .or_default()
                .insert(photographer_id.clone()),
            "photographer {photographer_id} booked twice on {date}"
        );
    }
    assert!(per_date.values().all(|booked| booked.len() <= 5));
}

#[test]
fn unknown_ids_are_reported_as_not_found() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    let missing = Uuid::new_v4();

    assert!(matches!(
        engine.assign_on(missing, today()).unwrap_err(),
        AssignmentError::EventNotFound(id) if id == missing
    ));
    assert!(matches!(
        engine.schedule(missing).unwrap_err(),
        AssignmentError::PhotographerNotFound(id) if id == missing
    ));
    assert!(matches!(
        engine.list_assignments(Some(missing)).unwrap_err(),
        AssignmentError::EventNotFound(_)
    ));
}

#[test]
fn schedule_of_unassigned_photographer_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    let ids = register(&conn, 1);

    assert!(engine.schedule(ids[0]).unwrap().is_empty());
}

#[test]
fn failed_batch_insert_rolls_back_earlier_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAssignmentRepository::new(&conn);
    let ids = register(&conn, 2);
    let event = insert_event(&conn, "E", shoot_day(), 2);

    let result: Result<(), photostaff_core::RepoError> = repo.in_write_transaction(|repo| {
        repo.insert_assignments(event.id, &[ids[0], ids[1], ids[0]])?;
        Ok(())
    });

    assert!(matches!(
        result.unwrap_err(),
        photostaff_core::RepoError::DuplicateAssignment { photographer_id, .. } if photographer_id == ids[0]
    ));
    assert_eq!(assignment_count(&conn), 0);
}

#[test]
fn deleting_photographer_frees_their_date() {
    let conn = open_db_in_memory().unwrap();
    let engine = AssignmentService::new(SqliteAssignmentRepository::new(&conn));
    let photographers = SqlitePhotographerRepository::new(&conn);
    let ids = register(&conn, 1);

    let first = insert_event(&conn, "First", shoot_day(), 1);
    engine.assign_on(first.id, today()).unwrap();
    photographers.delete_photographer(ids[0]).unwrap();
    assert_eq!(assignment_count(&conn), 0);

    let replacement = Photographer::new("New", "new@example.com", "");
    photographers.create_photographer(&replacement).unwrap();
    let second = insert_event(&conn, "Second", shoot_day(), 1);
    let outcome = engine.assign_on(second.id, today()).unwrap();
    assert_eq!(outcome.assigned_photographers[0].id, replacement.id);
}
