pub mod customer;
pub mod employee;
pub mod events;
pub mod owner;
pub mod public;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(public::configure)
        .configure(customer::configure)
        .configure(owner::configure)
        .configure(employee::configure);
}
