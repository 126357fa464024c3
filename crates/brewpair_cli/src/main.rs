//! CLI entry point.
//!
//! # Responsibility
//! - Wire `brewpair_core` services to a SQLite database file.
//! - Keep argument handling plain; every command maps onto one core call.

use brewpair_core::db::open_db;
use brewpair_core::service::schedule::ScheduleService;
use brewpair_core::{
    default_log_level, init_logging, make_email_body, reconcile_pairs, CycleStatus,
    MeetRecordRepository, MemberRepository, MemberScope, PairRepository, PairScope,
    SqliteMeetRecordRepository, SqliteMemberRepository, SqlitePairRepository,
};
use rand::rng;
use std::process::ExitCode;

const USAGE: &str = "usage: brewpair_cli <db-path> <command> [args]

commands:
  members                     list the roster
  add-member <name> [email]   add an active member and reconcile pairs
  edit-member <id> <name> [email]  rename a member / replace their email
  set-active <id> <on|off>    toggle a member and reconcile pairs
  pairs [all|active|inactive] list the pair universe
  reconcile                   align the pair universe with the roster
  cycle                       run one scheduling cycle
  records [n]                 show the n most recent meeting sets (default 3)
  email-preview               print the announcement body for the last set";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("BREWPAIR_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (db_path, command, rest) = match args.split_first() {
        Some((db_path, remainder)) => match remainder.split_first() {
            Some((command, rest)) => (db_path.clone(), command.clone(), rest.to_vec()),
            None => return usage(),
        },
        None => return usage(),
    };

    match run(&db_path, &command, &rest) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn usage() -> ExitCode {
    eprintln!("{USAGE}");
    ExitCode::FAILURE
}

fn run(db_path: &str, command: &str, rest: &[String]) -> Result<(), String> {
    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let members = SqliteMemberRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let pairs = SqlitePairRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let records = SqliteMeetRecordRepository::try_new(&conn).map_err(|err| err.to_string())?;

    match command {
        "members" => {
            for member in members
                .list_members(MemberScope::All)
                .map_err(|err| err.to_string())?
            {
                let state = if member.active { "active" } else { "inactive" };
                println!("{}\t{}\t{}", member.id, member.full_name, state);
            }
            Ok(())
        }
        "add-member" => {
            let name = rest.first().ok_or("add-member needs a name")?;
            let email = rest.get(1).map(String::as_str);
            let id = members
                .create_member(name, email, true)
                .map_err(|err| err.to_string())?;
            let outcome = reconcile_pairs(&members, &pairs).map_err(|err| err.to_string())?;
            println!("member {id} added, {} new pairs", outcome.created);
            Ok(())
        }
        "edit-member" => {
            let id = rest
                .first()
                .and_then(|raw| raw.parse().ok())
                .ok_or("edit-member needs a member id")?;
            let name = rest.get(1).ok_or("edit-member needs a name")?;
            let mut member = members.get_member(id).map_err(|err| err.to_string())?;
            member.full_name = name.clone();
            member.email = rest.get(2).cloned();
            members
                .update_member(&member)
                .map_err(|err| err.to_string())?;
            println!("member {id} updated");
            Ok(())
        }
        "set-active" => {
            let id = rest
                .first()
                .and_then(|raw| raw.parse().ok())
                .ok_or("set-active needs a member id")?;
            let active = match rest.get(1).map(String::as_str) {
                Some("on") => true,
                Some("off") => false,
                _ => return Err("set-active needs on|off".to_string()),
            };
            members
                .set_member_active(id, active)
                .map_err(|err| err.to_string())?;
            let outcome = reconcile_pairs(&members, &pairs).map_err(|err| err.to_string())?;
            println!(
                "member {id} updated: {} reactivated, {} deactivated, {} created",
                outcome.reactivated, outcome.deactivated, outcome.created
            );
            Ok(())
        }
        "pairs" => {
            let scope = match rest.first().map(String::as_str) {
                None | Some("all") => PairScope::All,
                Some("active") => PairScope::Active,
                Some("inactive") => PairScope::Inactive,
                Some(other) => return Err(format!("unknown pair scope `{other}`")),
            };
            for pair in pairs.list_pairs(scope).map_err(|err| err.to_string())? {
                let state = if pair.active { "active" } else { "inactive" };
                println!("{}\t{}\t{}\t{}", pair.key, pair.label, pair.meetings, state);
            }
            Ok(())
        }
        "reconcile" => {
            let outcome = reconcile_pairs(&members, &pairs).map_err(|err| err.to_string())?;
            println!(
                "reconciled: {} created, {} reactivated, {} deactivated",
                outcome.created, outcome.reactivated, outcome.deactivated
            );
            Ok(())
        }
        "cycle" => {
            let service = ScheduleService::new(&members, &pairs, &records);
            let outcome = service.run_cycle(&mut rng()).map_err(|err| err.to_string())?;
            for line in &outcome.pairings {
                println!("{line}");
            }
            match outcome.status {
                CycleStatus::Complete => println!("cycle complete: {} meetings", outcome.pairings.len()),
                CycleStatus::Deficit => println!(
                    "cycle finished with a deficit: only {} meetings could be set",
                    outcome.pairings.len()
                ),
            }
            Ok(())
        }
        "records" => {
            let count = rest
                .first()
                .map(|raw| raw.parse().map_err(|_| "records count must be a number"))
                .transpose()?
                .unwrap_or(3);
            for record in records
                .last_records(count)
                .map_err(|err| err.to_string())?
            {
                println!("-- set {} at {}", record.id, record.recorded_at);
                println!("{}", record.detail);
            }
            Ok(())
        }
        "email-preview" => {
            let latest = records
                .latest_record()
                .map_err(|err| err.to_string())?
                .ok_or("no meeting sets recorded yet")?;
            println!("{}", make_email_body(latest.detail.trim(), false));
            Ok(())
        }
        other => Err(format!("unknown command `{other}`\n{USAGE}")),
    }
}
