use crate::constants::PAGE_SIZE;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Observation {
    pub timestamp: u64,
    /// Tick recorded at `timestamp`, after truncation.
    pub tick: i32,
    /// Sum of `tick * seconds` over the history up to `timestamp`.
    /// The tick of each slot prevails until the next slot is written.
    pub tick_cumulative: i64,
}

type ObservationPage = [Observation; PAGE_SIZE];

/// Fixed-size pages of observation slots addressed by a flat index.
///
/// Slot `i` lives in page `i / PAGE_SIZE`; pages are only ever appended,
/// so growing the history never moves existing slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObservationPages {
    pages: Vec<Box<ObservationPage>>,
}

impl ObservationPages {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn capacity(&self) -> u32 {
        (self.pages.len() * PAGE_SIZE) as u32
    }

    /// Allocates pages until at least `slots` slots are addressable.
    pub fn reserve(&mut self, slots: u32) {
        while self.capacity() < slots {
            self.pages.push(Box::new([Observation::default(); PAGE_SIZE]));
        }
    }

    pub fn get(&self, index: u32) -> Option<&Observation> {
        let index = index as usize;
        self.pages
            .get(index / PAGE_SIZE)
            .map(|page| &page[index % PAGE_SIZE])
    }

    // callers keep `index` below the reserved capacity
    pub(crate) fn at(&self, index: u32) -> Observation {
        let index = index as usize;
        self.pages[index / PAGE_SIZE][index % PAGE_SIZE]
    }

    pub(crate) fn set(&mut self, index: u32, observation: Observation) {
        let index = index as usize;
        self.pages[index / PAGE_SIZE][index % PAGE_SIZE] = observation;
    }
}
