mod command;
mod dispatch;
