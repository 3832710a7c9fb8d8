use crate::{
    api::{approvals, leave_request, notifications, reports, team, timesheet},
    config::Config,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Identity comes from gateway headers, extracted per handler
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/timesheet")
                    // /timesheet
                    .service(web::resource("").route(web::get().to(timesheet::list_entries)))
                    // /timesheet/submit
                    .service(
                        web::resource("/submit").route(web::post().to(timesheet::submit_week)),
                    )
                    // /timesheet/copy-previous
                    .service(
                        web::resource("/copy-previous")
                            .route(web::post().to(timesheet::copy_previous_week)),
                    )
                    // /timesheet/export
                    .service(
                        web::resource("/export").route(web::get().to(timesheet::export_report)),
                    )
                    // /timesheet/{date}
                    .service(web::resource("/{date}").route(web::put().to(timesheet::save_entry))),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/balance
                    .service(
                        web::resource("/balance")
                            .route(web::get().to(leave_request::leave_balance)),
                    )
                    // /leave/{id}
                    .service(
                        web::resource("/{id}").route(web::delete().to(leave_request::cancel_leave)),
                    ),
            )
            .service(
                web::scope("/approvals")
                    // /approvals
                    .service(web::resource("").route(web::get().to(approvals::list_approvals)))
                    // /approvals/approve-all
                    .service(
                        web::resource("/approve-all").route(web::post().to(approvals::approve_all)),
                    )
                    // /approvals/{id}/approve
                    .service(
                        web::resource("/{id}/approve").route(web::put().to(approvals::approve)),
                    )
                    // /approvals/{id}/reject
                    .service(web::resource("/{id}/reject").route(web::put().to(approvals::reject))),
            )
            .service(
                web::scope("/notifications")
                    // /notifications
                    .service(
                        web::resource("")
                            .route(web::get().to(notifications::list_notifications)),
                    )
                    // /notifications/read-all
                    .service(
                        web::resource("/read-all")
                            .route(web::put().to(notifications::mark_all_read)),
                    )
                    // /notifications/{id}/read
                    .service(
                        web::resource("/{id}/read").route(web::put().to(notifications::mark_read)),
                    ),
            )
            .service(
                web::scope("/reports")
                    .service(web::resource("/team").route(web::get().to(reports::team_stats)))
                    .service(
                        web::resource("/leaderboard").route(web::get().to(reports::leaderboard)),
                    )
                    .service(
                        web::resource("/pending").route(web::get().to(reports::pending_summary)),
                    )
                    .service(web::resource("/week").route(web::get().to(reports::week_completion)))
                    .service(web::resource("/leaves").route(web::get().to(reports::team_leaves))),
            )
            .service(
                web::scope("/team")
                    // /team
                    .service(web::resource("").route(web::get().to(team::list_team)))
                    // /team/{id}/remind
                    .service(
                        web::resource("/{id}/remind").route(web::post().to(team::send_reminder)),
                    ),
            )
            .service(web::resource("/projects").route(web::get().to(team::list_projects))),
    );
}
