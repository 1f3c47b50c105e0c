/*!

This is the long-form manual for `legis_analysis` and `legistrack`.

## Data layout

`legistrack` reads the bill data in the layout of the congress project scrapers:

```text
data/
  congress/
    114/
      bills/
        hr/
          hr2029/
            data.json
            text-versions/
              ih/
                data.json
                document.xml
              enr/
                ...
  analysis/
    by-congress/
      114/
        text_comparison.csv
        text_incorporation.json
        sponsorshipanalysis_h.txt
        sponsorshipanalysis_h_meta.txt
        sponsorshipanalysis_s.txt
        sponsorshipanalysis_s_meta.txt
        session-1/
          ...
  legislators.json
  sessions.tsv
```

All these paths can be changed with a configuration file (see below).

The `data.json` file of a bill gives its type, number, Congress, title, status and status
date, introduced date, sponsor, cosponsors and related bills. The `data.json` file of a text
version gives its issue date.

## Text incorporation

Text incorporation runs in two phases over a Congress.

### `analyze`

For every enacted bill (`hr`, `s`, `hjres`, `sjres` only), the latest text version is
compared with the latest text version of a shortlist of other bills: the bills of the same
Congress with the closest vocabulary, plus the related bills listed in the metadata. The
shortlist has one candidate per thousand characters of the enacted text, between 10 and 50.

A candidate is skipped when:
- it is itself enacted,
- it is not the same kind of measure (a bill against a resolution),
- it has no text,
- the pair of versions was already compared in an earlier run,
- its last action is more recent than the one of the enacted bill.

Every comparison is appended to the ledger `text_comparison.csv`. This file has no header
row and the following columns:

| column           | content                                           |
|------------------|---------------------------------------------------|
| `timestamp`      | RFC 3339 time of the comparison                   |
| `bill1_id`       | the enacted bill, e.g. `hr2029-114`               |
| `bill1_version`  | text version code of the enacted bill, e.g. `enr` |
| `ratio1`         | share of the enacted bill found in the candidate  |
| `bill2_id`       | the candidate bill                                |
| `bill2_version`  | text version code of the candidate                |
| `ratio2`         | share of the candidate found in the enacted bill  |
| `matched_length` | length in characters of the text in common        |
| `sample_text`    | a sample of the text in common, or empty          |

The ledger is rewritten through a temporary file, so an interrupted run leaves the previous
ledger in place. A new run picks up where the last one stopped.

### `load`

The ledger is turned into incorporation relations. Only the rows of the latest version of
each enacted bill count. A pair is accepted when:
- both bills reflect each other well (product of the ratios above 0.95, lowered by the
  length of the match down to 0.66) over more than 300 characters, or
- one bill is mostly found in the other (ratio above 0.8, lowered down to 0.33) over more
  than 800 characters, or
- more than 15% of one bill is found in the other over more than 8000 characters.

Bills with formulaic titles (namings of post offices, private relief, commemorative coins)
must in addition have a product of ratios of at least 0.85.

The relations are stored in `text_incorporation.json`, an object from bill id to the list of
relations of the bill. Both bills of an accepted pair get a relation:

```json
{
  "hr2029-114": [
    {
      "my_version": "enr",
      "my_ratio": 0.12,
      "other": "hr1314-114",
      "other_version": "ih",
      "other_ratio": 0.98
    }
  ]
}
```

Only the bills whose relations changed are updated, and the file is not touched at all when
nothing changed.

### `compare`

Compares the latest text of two bills and prints the ratios, the matched length, a sample
of the text in common and the verdict. With `--diff`, a word diff is printed as well.

## Cosponsorship analysis

`cosponsors <congress>` computes, for each chamber, a leadership score and an ideology score
for every member who served in the Congress. The cosponsorships of the bills introduced in
the Congress and the two previous ones (see `--since`) are counted. With `--session`, only the
cosponsorships made during that session count and the results are written under
`session-{name}`.

The output file `sponsorshipanalysis_{h|s}.txt` is a CSV file with a header row:

```text
ID,ideology,leadership,name,party,description,introduced_bills_114,cosponsored_bills_114,unique_cosponsors_114,total_cosponsors_114
```

The ideology and the leadership are between 0 and 1. On the ideology scale, Republicans are
on the right. On the leadership scale, the median member is at 0.5. The description places
each member within their own party, for example `rank-and-file Democrat`.

The companion file `sponsorshipanalysis_{h|s}_meta.txt` is a JSON object with the
`start_date` and `end_date` of the bills that were counted.

`legislators.json` is a list of legislators:

```json
[
  {
    "id": { "bioguide": "A000055" },
    "name": { "last": "Aderholt" },
    "terms": [
      { "type": "rep", "start": "2015-01-06", "end": "2017-01-03", "state": "AL", "district": 4, "party": "Republican" }
    ]
  }
]
```

`sessions.tsv` is a tab-separated file with the congress, the session name and the start and
end dates of each session:

```text
congress	session	start	end
114	1	2015-01-06	2015-12-18
114	2	2016-01-04	2017-01-03
```

## Configuration

All the paths can be set with a JSON configuration file passed with `--config`. A relative
`dataDirectory` is resolved against the directory of the configuration file, and the other
relative paths against the data directory.

```json
{
  "dataDirectory": "/data/legislation",
  "congressDirectory": "congress",
  "analysisDirectory": "analysis",
  "legislatorsFile": "legislators.json",
  "sessionsFile": "sessions.tsv",
  "minCandidates": 10,
  "maxCandidates": 50
}
```

All the entries are optional. The `congressDirectory`, `analysisDirectory`, `legislatorsFile`
and `sessionsFile` default to the values above, and the data directory defaults to `data`. The
`--data-dir` option overrides the data directory of the configuration file.
*/
