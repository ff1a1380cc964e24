mod deploy;
mod lfs;
mod repo;
mod webhook;
