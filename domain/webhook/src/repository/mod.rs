mod argo_workflow;

#[rustfmt::skip]
pub use {
    argo_workflow::ArgoWorkflowRepo,
};
