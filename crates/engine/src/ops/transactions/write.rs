mod create;
mod delete;
mod transfer;
mod update;
