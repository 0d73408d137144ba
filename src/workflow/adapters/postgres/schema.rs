//! Diesel schema for workflow persistence.

diesel::table! {
    /// Print jobs.
    jobs (id) {
        /// Internal job identifier.
        id -> Uuid,
        /// Display number drawn from `job_number_seq`.
        job_number -> Int8,
        /// Job type label.
        #[max_length = 100]
        job_type -> Varchar,
        /// Ordered quantity.
        quantity -> Int4,
        /// Job status.
        #[max_length = 50]
        status -> Varchar,
        /// Delivery deadline.
        delivery_deadline -> Timestamptz,
        /// Explicit per-stage deadline overrides keyed by stage.
        stage_deadlines -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Production tasks, one per job stage.
    production_tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning job; deleting the job cascades.
        job_id -> Uuid,
        /// One-based position within the job, unique per job.
        sequence -> Int4,
        /// Production stage.
        #[max_length = 50]
        stage -> Varchar,
        /// Department performing the stage.
        department_id -> Nullable<Uuid>,
        /// Assigned employee; cleared when the employee is deleted.
        assignee_id -> Nullable<Uuid>,
        /// Task deadline.
        deadline -> Timestamptz,
        /// Task status.
        #[max_length = 50]
        status -> Varchar,
        /// Free-form remarks.
        remarks -> Nullable<Text>,
        /// Delay explanation.
        delay_comment -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Production departments.
    departments (id) {
        /// Internal department identifier.
        id -> Uuid,
        /// Unique department name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Employees.
    employees (id) {
        /// Internal employee identifier.
        id -> Uuid,
        /// Employee name.
        #[max_length = 255]
        name -> Varchar,
        /// Department the employee belongs to.
        department_id -> Nullable<Uuid>,
        /// System role.
        #[max_length = 50]
        role -> Varchar,
    }
}

diesel::joinable!(production_tasks -> jobs (job_id));

diesel::allow_tables_to_appear_in_same_query!(jobs, production_tasks, departments, employees);
