mod properties;
mod workflow;
