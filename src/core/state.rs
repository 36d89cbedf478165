use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

// Index into Task Vec. Tasks are created in (arrival, id) order, so TaskId
// order doubles as the tie-break order.
pub type TaskId = usize;
pub type Ticks = u64;
pub type QueueLevel = u8;
new_key_type! {
    pub struct DsqId;
}

// Lowest key first, then lowest TaskId
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct Rank {
    pub key: Ticks,
    pub task: TaskId,
}

impl Rank {
    pub fn new(key: Ticks, task: TaskId) -> Self {
        Self { key, task }
    }
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Rank's Ord
impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (other.key, other.task).cmp(&(self.key, self.task))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    // Not arrived yet
    Pending,
    Runnable,
    Running,
    Completed,
}

#[derive(Debug)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub state: TaskState,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub remaining: Ticks,
    pub allocated_timeslice: Option<Ticks>,
    pub consumed_timeslice: Ticks,
    // MLFQ bookkeeping; other policies leave these untouched
    pub queue_level: Option<QueueLevel>,
    pub allotment: Ticks,
    pub start_time: Option<Ticks>,
    pub finish_time: Option<Ticks>,
}

#[derive(Debug, Default)]
pub struct CpuState {
    pub current: Option<TaskId>,
}

#[derive(Debug)]
pub enum Dsq {
    Fifo {
        tasks: VecDeque<TaskId>,
    },
    Priq {
        tasks: KeyedPriorityQueue<TaskId, Rank>,
    },
}

impl Dsq {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            tasks: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            tasks: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        match self {
            Self::Fifo { tasks } => tasks.contains(&task_id),
            Self::Priq { tasks } => tasks.iter().any(|t| *t.0 == task_id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { tasks } => tasks.len(),
            Self::Priq { tasks } => tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct RunCtx {
    pub now: Ticks,
    pub cpu: CpuState,
    pub tasks: Vec<Task>,
    pub dsqs: SlotMap<DsqId, Dsq>,
    pub task_to_dsq: FxHashMap<TaskId, DsqId>,
    pub global_dsq_id: DsqId,
    pub local_dsq_id: DsqId,
}

impl RunCtx {
    pub fn new() -> Self {
        let mut dsqs = SlotMap::with_capacity_and_key(2);
        let global_dsq_id = dsqs.insert(Dsq::new_fifo());
        let local_dsq_id = dsqs.insert(Dsq::new_fifo());

        Self {
            now: 0,
            cpu: CpuState::default(),
            tasks: Vec::new(),
            dsqs,
            task_to_dsq: FxHashMap::default(),
            global_dsq_id,
            local_dsq_id,
        }
    }

    pub fn create_task(&mut self, name: String, arrival_time: Ticks, burst_time: Ticks) -> TaskId {
        let id = self.tasks.len();
        debug_assert!(burst_time > 0, "Task {name} needs a positive burst");

        self.tasks.push(Task {
            id,
            name,
            state: TaskState::Pending,
            arrival_time,
            burst_time,
            remaining: burst_time,
            allocated_timeslice: None,
            consumed_timeslice: 0,
            queue_level: None,
            allotment: 0,
            start_time: None,
            finish_time: None,
        });

        id
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn create_dsq_fifo(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_fifo())
    }

    pub fn create_dsq_priq(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_priq())
    }

    fn dsq_push(&mut self, dsq_id: DsqId, task_id: TaskId, slice: Ticks, rank: Option<Rank>) {
        assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Task {task_id} already present in some DSQ"
        );

        let task = self.task_mut(task_id);
        debug_assert!(
            task.state == TaskState::Runnable,
            "Task {task_id} must be Runnable when enqueued"
        );

        task.allocated_timeslice = Some(slice);
        let dsq = self.dsqs.get_mut(dsq_id).expect("Unknown DSQ");

        match dsq {
            Dsq::Fifo { tasks } => tasks.push_back(task_id),
            Dsq::Priq { tasks } => {
                tasks.push(
                    task_id,
                    rank.expect("Attempted to push to a priority DSQ with no rank"),
                );
            }
        };

        self.task_to_dsq.insert(task_id, dsq_id);
    }

    pub fn dsq_push_fifo(&mut self, dsq_id: DsqId, task_id: TaskId, slice: Ticks) {
        self.dsq_push(dsq_id, task_id, slice, None);
    }

    pub fn dsq_push_priq(&mut self, dsq_id: DsqId, task_id: TaskId, slice: Ticks, key: Ticks) {
        self.dsq_push(dsq_id, task_id, slice, Some(Rank::new(key, task_id)));
    }

    pub fn dsq_pop(&mut self, dsq_id: DsqId) -> Option<TaskId> {
        let dsq = self.dsqs.get_mut(dsq_id)?;
        let task = match dsq {
            Dsq::Fifo { tasks } => tasks.pop_front(),
            Dsq::Priq { tasks } => tasks.pop().map(|t| t.0),
        }?;

        let removed = self.task_to_dsq.remove(&task);
        debug_assert!(removed.is_some(), "Task {task} missing DSQ membership");

        Some(task)
    }

    pub fn dsq_move_to_local(&mut self, dsq_id: DsqId) -> Option<TaskId> {
        let task = self.dsq_pop(dsq_id)?;
        let slice = self
            .task(task)
            .allocated_timeslice
            .expect("Task on DSQ must have slice");
        self.dsq_push_fifo(self.local_dsq(), task, slice);
        Some(task)
    }

    pub fn dsq_is_empty(&self, dsq_id: DsqId) -> bool {
        self.dsqs.get(dsq_id).is_none_or(Dsq::is_empty)
    }

    pub fn task_in_any_dsq(&self, task_id: TaskId) -> bool {
        self.task_to_dsq.contains_key(&task_id)
    }

    pub fn has_runnable_work(&self) -> bool {
        self.cpu.current.is_some() || !self.task_to_dsq.is_empty()
    }

    pub fn task(&self, task_id: TaskId) -> &Task {
        &self.tasks[task_id]
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> &mut Task {
        &mut self.tasks[task_id]
    }

    pub fn global_dsq(&self) -> DsqId {
        self.global_dsq_id
    }

    pub fn local_dsq(&self) -> DsqId {
        self.local_dsq_id
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.cpu.current.is_none()
    }

    pub fn mark_runnable(&mut self, task_id: TaskId) {
        let task = self.task_mut(task_id);
        debug_assert!(
            task.state != TaskState::Completed,
            "Completed task {} cannot be runnable",
            task.id
        );
        task.state = TaskState::Runnable;
    }

    pub fn mark_completed(&mut self, task_id: TaskId, finish_time: Ticks) {
        debug_assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Completing task {} that is still enqueued",
            task_id
        );

        let task = &mut self.tasks[task_id];
        debug_assert!(
            task.state == TaskState::Running,
            "Task {task_id} must have been running before marked complete"
        );
        debug_assert_eq!(task.remaining, 0, "Task {task_id} completed with work left");

        task.state = TaskState::Completed;
        task.finish_time = Some(finish_time);
    }

    // Return previous state
    pub fn set_running(&mut self, task_id: TaskId) -> TaskState {
        debug_assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Running task {task_id} must not be enqueued"
        );
        debug_assert!(self.cpu.current.is_none(), "CPU already running a task");

        let now = self.now;
        self.cpu.current = Some(task_id);
        let task = self.task_mut(task_id);
        let prev_state = task.state;
        task.state = TaskState::Running;
        task.consumed_timeslice = 0;
        task.start_time.get_or_insert(now);
        prev_state
    }

    pub fn clear_cpu(&mut self) {
        self.cpu.current = None;
    }
}

impl Default for RunCtx {
    fn default() -> Self {
        Self::new()
    }
}
