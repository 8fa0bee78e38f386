// Candidate post texts for the generator. Fixed at compile time.

pub const TEMPLATE_POOL: [&str; 30] = [
    "You won't believe how this one ends...",
    "Saved this the second I saw it. Watch before it's gone",
    "Took me three days to track this down. Worth it",
    "This is the clip everyone's been asking about",
    "Found it. Sharing so you don't have to search",
    "Can't stop rewatching this one...",
    "Stumbled on this late last night and still thinking about it",
    "If you only watch one thing today, make it this",
    "Finally found the full version",
    "This deserves way more attention than it's getting",
    "Trust me, stay until the end",
    "Bookmark this. You'll want it later",
    "How is this not everywhere already?",
    "Found the source. Here it is",
    "This one caught me completely off guard",
    "Still can't believe this is real...",
    "Everyone I showed this to had the same reaction",
    "The best thing I've seen all week",
    "Saving this before it disappears",
    "Couldn't keep this one to myself",
    "Spent all night looking for this. Found it",
    "Watch it once and you'll get why I'm posting it",
    "This is the one people keep sending me",
    "Honestly didn't expect it to be this good",
    "Tracked it down. Sharing for the people who asked",
    "One of those clips you watch twice in a row",
    "Had to share this one right away",
    "Is this real? Watch and decide for yourself",
    "Couldn't look away from this...",
    "Found it at last. Absolutely worth the search",
];
